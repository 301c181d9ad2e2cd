//! Workflow visibility metadata.

use objectstore_core::{
    Component, Element, Error, ParentChain, Result, ValidationContext, ValidationFlow, codes,
    expect_node, read_id, require_attribute,
};

/// How the workflow id list is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowKind {
    /// Content may enter only the listed workflows.
    #[default]
    Inclusionary,
    /// Content may enter any workflow except the listed ones.
    Exclusionary,
}

impl WorkflowKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inclusionary => "inclusionary",
            Self::Exclusionary => "exclusionary",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "inclusionary" => Some(Self::Inclusionary),
            "exclusionary" => Some(Self::Exclusionary),
            _ => None,
        }
    }
}

/// Restricts which workflows content of some type may enter.
///
/// ```xml
/// <PSXWorkflowInfo id="0" type="inclusionary" values="1,3,4"/>
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkflowInfo {
    id: i32,
    kind: WorkflowKind,
    workflow_ids: Vec<i32>,
}

impl WorkflowInfo {
    pub fn new(kind: WorkflowKind, workflow_ids: Vec<i32>) -> Self {
        Self {
            id: 0,
            kind,
            workflow_ids,
        }
    }

    pub fn kind(&self) -> WorkflowKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: WorkflowKind) {
        self.kind = kind;
    }

    pub fn workflow_ids(&self) -> &[i32] {
        &self.workflow_ids
    }

    pub fn set_workflow_ids(&mut self, ids: Vec<i32>) {
        self.workflow_ids = ids;
    }

    fn values_attr(&self) -> String {
        self.workflow_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Component for WorkflowInfo {
    const NODE_NAME: &'static str = "PSXWorkflowInfo";

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn from_xml(element: &Element, _chain: &mut ParentChain) -> Result<Self> {
        expect_node(element, Self::NODE_NAME)?;
        let id = read_id(element, Self::NODE_NAME)?;

        let raw_kind = require_attribute(element, Self::NODE_NAME, "type")?;
        let kind = WorkflowKind::parse(raw_kind).ok_or_else(|| Error::InvalidAttributeValue {
            node: Self::NODE_NAME,
            attribute: "type",
            value: raw_kind.to_string(),
        })?;

        let mut workflow_ids = Vec::new();
        if let Some(raw) = element.attribute("values") {
            for token in raw.split(',') {
                let token = token.trim();
                if token.is_empty() {
                    continue;
                }
                let parsed = token.parse::<i32>().map_err(|_| Error::InvalidNumber {
                    node: Self::NODE_NAME,
                    field: "values",
                    value: token.to_string(),
                })?;
                workflow_ids.push(parsed);
            }
        }

        Ok(Self {
            id,
            kind,
            workflow_ids,
        })
    }

    fn to_xml(&self) -> Element {
        Element::new(Self::NODE_NAME)
            .with_attribute("id", self.id.to_string())
            .with_attribute("type", self.kind.as_str())
            .with_attribute("values", self.values_attr())
    }

    fn validate(&self, ctx: &mut ValidationContext) -> Result<()> {
        if ctx.begin_validation(Self::NODE_NAME, self.kind.as_str()) == ValidationFlow::Skip {
            return Ok(());
        }
        for id in &self.workflow_ids {
            if *id <= 0 {
                ctx.error(
                    Self::NODE_NAME,
                    codes::INVALID_ID_VALUE,
                    &[&id.to_string()],
                )?;
            }
        }
        if self.workflow_ids.is_empty() {
            ctx.warning(Self::NODE_NAME, codes::EMPTY_SET, &[Self::NODE_NAME]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_both_kinds() {
        let info = WorkflowInfo::new(WorkflowKind::Inclusionary, vec![1, 3, 4]);
        let back = WorkflowInfo::from_xml(&info.to_xml(), &mut ParentChain::new()).unwrap();
        assert_eq!(info, back);

        let empty = WorkflowInfo::new(WorkflowKind::Exclusionary, Vec::new());
        let back = WorkflowInfo::from_xml(&empty.to_xml(), &mut ParentChain::new()).unwrap();
        assert_eq!(empty, back);
    }

    #[test]
    fn bad_kind_attribute_is_distinguished() {
        let el = Element::parse_document("<PSXWorkflowInfo type=\"open\" values=\"1\"/>").unwrap();
        let err = WorkflowInfo::from_xml(&el, &mut ParentChain::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidAttributeValue { attribute: "type", .. }
        ));
    }

    #[test]
    fn bad_id_token_is_a_number_error() {
        let el =
            Element::parse_document("<PSXWorkflowInfo type=\"inclusionary\" values=\"1,x\"/>")
                .unwrap();
        let err = WorkflowInfo::from_xml(&el, &mut ParentChain::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidNumber { .. }));
    }

    #[test]
    fn nonpositive_ids_and_empty_sets_surface_in_validation() {
        let info = WorkflowInfo::new(WorkflowKind::Inclusionary, vec![0, 5]);
        let mut ctx = ValidationContext::new();
        info.validate(&mut ctx).unwrap();
        assert_eq!(ctx.error_count(), 1);
        assert_eq!(ctx.issues()[0].code, codes::INVALID_ID_VALUE);

        let empty = WorkflowInfo::new(WorkflowKind::Exclusionary, Vec::new());
        let mut ctx = ValidationContext::new();
        empty.validate(&mut ctx).unwrap();
        assert_eq!(ctx.warning_count(), 1);
    }
}
