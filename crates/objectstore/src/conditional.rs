//! Conditional expressions.

use objectstore_core::{
    Ancestor, Component, Element, Error, ParentChain, Result, ValidationContext, codes,
    expect_node, read_id, require_attribute, require_child,
};

use crate::replacement::ReplacementValue;

/// Comparison operator of a conditional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConditionalOp {
    #[default]
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEquals,
    GreaterThan,
    GreaterThanOrEquals,
    Like,
    NotLike,
    In,
    NotIn,
    IsNull,
    IsNotNull,
}

impl ConditionalOp {
    /// The operator as spelled in the XML `operator` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "<>",
            Self::LessThan => "<",
            Self::LessThanOrEquals => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEquals => ">=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
        }
    }

    /// Parse the attribute spelling back into an operator.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "=" => Some(Self::Equals),
            "<>" => Some(Self::NotEquals),
            "<" => Some(Self::LessThan),
            "<=" => Some(Self::LessThanOrEquals),
            ">" => Some(Self::GreaterThan),
            ">=" => Some(Self::GreaterThanOrEquals),
            "LIKE" => Some(Self::Like),
            "NOT LIKE" => Some(Self::NotLike),
            "IN" => Some(Self::In),
            "NOT IN" => Some(Self::NotIn),
            "IS NULL" => Some(Self::IsNull),
            "IS NOT NULL" => Some(Self::IsNotNull),
            _ => None,
        }
    }

    /// Unary operators take no right-hand value.
    pub fn is_unary(self) -> bool {
        matches!(self, Self::IsNull | Self::IsNotNull)
    }
}

impl std::fmt::Display for ConditionalOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connective joining this conditional to the next one in a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoolOp {
    #[default]
    And,
    Or,
}

impl BoolOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            _ => None,
        }
    }
}

/// One `variable op value` clause, chained by a boolean connective.
///
/// ```xml
/// <PSXConditional id="0" operator="=" boolean="AND">
///   <variable><PSXUserContext id="1"><name>User/Name</name></PSXUserContext></variable>
///   <value><PSXTextLiteral id="2"><text>admin</text></PSXTextLiteral></value>
/// </PSXConditional>
/// ```
///
/// Unary operators (`IS NULL`, `IS NOT NULL`) omit the `value` child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conditional {
    id: i32,
    variable: ReplacementValue,
    op: ConditionalOp,
    value: Option<ReplacementValue>,
    bool_op: BoolOp,
}

impl Conditional {
    /// Create a conditional. A binary operator without a value is an
    /// immediate argument error.
    pub fn new(
        variable: impl Into<ReplacementValue>,
        op: ConditionalOp,
        value: Option<ReplacementValue>,
    ) -> Result<Self> {
        if !op.is_unary() && value.is_none() {
            return Err(Error::invalid_argument(
                "PSXConditional",
                format!("operator \"{op}\" requires a value"),
            ));
        }
        Ok(Self {
            id: 0,
            variable: variable.into(),
            op,
            value,
            bool_op: BoolOp::And,
        })
    }

    pub fn variable(&self) -> &ReplacementValue {
        &self.variable
    }

    pub fn op(&self) -> ConditionalOp {
        self.op
    }

    pub fn value(&self) -> Option<&ReplacementValue> {
        self.value.as_ref()
    }

    pub fn bool_op(&self) -> BoolOp {
        self.bool_op
    }

    pub fn set_bool_op(&mut self, bool_op: BoolOp) {
        self.bool_op = bool_op;
    }
}

impl Component for Conditional {
    const NODE_NAME: &'static str = "PSXConditional";

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn from_xml(element: &Element, chain: &mut ParentChain) -> Result<Self> {
        expect_node(element, Self::NODE_NAME)?;
        let id = read_id(element, Self::NODE_NAME)?;

        let raw_op = require_attribute(element, Self::NODE_NAME, "operator")?;
        let op = ConditionalOp::parse(raw_op).ok_or_else(|| Error::InvalidAttributeValue {
            node: Self::NODE_NAME,
            attribute: "operator",
            value: raw_op.to_string(),
        })?;

        let bool_op = match element.attribute("boolean") {
            None => BoolOp::And,
            Some(raw) => BoolOp::parse(raw).ok_or_else(|| Error::InvalidAttributeValue {
                node: Self::NODE_NAME,
                attribute: "boolean",
                value: raw.to_string(),
            })?,
        };

        let mut scope = chain.push(Ancestor::new(Self::NODE_NAME, id));

        let variable_el = require_child(element, Self::NODE_NAME, "variable")?;
        let variable_value = variable_el.first_child().ok_or(Error::MissingChild {
            node: Self::NODE_NAME,
            child: "variable value",
        })?;
        let variable = ReplacementValue::from_element(variable_value, &mut scope)?;

        let value = if op.is_unary() {
            None
        } else {
            let value_el = require_child(element, Self::NODE_NAME, "value")?;
            let inner = value_el.first_child().ok_or(Error::MissingChild {
                node: Self::NODE_NAME,
                child: "value",
            })?;
            Some(ReplacementValue::from_element(inner, &mut scope)?)
        };

        Ok(Self {
            id,
            variable,
            op,
            value,
            bool_op,
        })
    }

    fn to_xml(&self) -> Element {
        let mut root = Element::new(Self::NODE_NAME)
            .with_attribute("id", self.id.to_string())
            .with_attribute("operator", self.op.as_str())
            .with_attribute("boolean", self.bool_op.as_str());
        root.push_element(Element::new("variable").with_element(self.variable.to_xml()));
        if let Some(value) = &self.value {
            root.push_element(Element::new("value").with_element(value.to_xml()));
        }
        root
    }

    fn validate(&self, ctx: &mut ValidationContext) -> Result<()> {
        // Skip is advisory; conditionals check anyway.
        let _ = ctx.begin_validation(Self::NODE_NAME, self.op.as_str());
        if !self.op.is_unary() && self.value.is_none() {
            ctx.error(Self::NODE_NAME, codes::MISSING_OPERAND, &[self.op.as_str()])?;
        }
        let mut scope = ctx.push_parent(Ancestor::new(Self::NODE_NAME, self.id));
        self.variable.validate(&mut scope)?;
        if let Some(value) = &self.value {
            value.validate(&mut scope)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::TextLiteral;
    use crate::user_context::UserContext;

    fn sample() -> Conditional {
        Conditional::new(
            UserContext::new("User/Name").unwrap(),
            ConditionalOp::Equals,
            Some(TextLiteral::new("admin").into()),
        )
        .unwrap()
    }

    #[test]
    fn round_trips_binary_and_unary() {
        let binary = sample();
        let back = Conditional::from_xml(&binary.to_xml(), &mut ParentChain::new()).unwrap();
        assert_eq!(binary, back);

        let unary = Conditional::new(
            UserContext::new("User/Name").unwrap(),
            ConditionalOp::IsNull,
            None,
        )
        .unwrap();
        let back = Conditional::from_xml(&unary.to_xml(), &mut ParentChain::new()).unwrap();
        assert_eq!(unary, back);
    }

    #[test]
    fn binary_operator_requires_value() {
        let err = Conditional::new(
            TextLiteral::new("x"),
            ConditionalOp::GreaterThan,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn bad_operator_attribute_is_distinguished() {
        let doc = "<PSXConditional operator=\"~=\"><variable><PSXTextLiteral id=\"1\"><text>x</text></PSXTextLiteral></variable></PSXConditional>";
        let el = Element::parse_document(doc).unwrap();
        let err = Conditional::from_xml(&el, &mut ParentChain::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidAttributeValue {
                attribute: "operator",
                ..
            }
        ));
    }

    #[test]
    fn absent_boolean_defaults_to_and() {
        let doc = "<PSXConditional operator=\"IS NULL\"><variable><PSXTextLiteral id=\"1\"><text>x</text></PSXTextLiteral></variable></PSXConditional>";
        let el = Element::parse_document(doc).unwrap();
        let cond = Conditional::from_xml(&el, &mut ParentChain::new()).unwrap();
        assert_eq!(cond.bool_op(), BoolOp::And);
    }
}
