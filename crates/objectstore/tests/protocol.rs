//! Cross-cutting protocol properties: parent-chain balance, validation
//! idempotence and escalation, and copy/equality conventions.

use objectstore::prelude::*;
use objectstore::{Ancestor, Error, codes};

#[test]
fn parent_chain_is_balanced_after_success() {
    let doc = "<PSXRole id=\"1\" name=\"Editor\"><PSXPropertySet/><Subjects>\
        <PSXSubject id=\"0\" name=\"editor1\" type=\"user\"/></Subjects></PSXRole>";
    let element = Element::parse_document(doc).unwrap();

    let mut chain = ParentChain::new();
    let mut outer = chain.push(Ancestor::new("PSXApplication", 0));
    assert_eq!(outer.len(), 1);
    Role::from_xml(&element, &mut outer).unwrap();
    assert_eq!(outer.len(), 1);
    drop(outer);
    assert_eq!(chain.len(), 0);
}

#[test]
fn parent_chain_is_balanced_after_failure() {
    // The failure happens two levels deep: the subject carries a bad type.
    let doc = "<PSXRole id=\"1\" name=\"Editor\"><Subjects>\
        <PSXSubject id=\"0\" name=\"x\" type=\"robot\"/></Subjects></PSXRole>";
    let element = Element::parse_document(doc).unwrap();

    let mut chain = ParentChain::new();
    let mut outer = chain.push(Ancestor::new("PSXApplication", 0));
    let err = Role::from_xml(&element, &mut outer).unwrap_err();
    assert!(matches!(err, Error::InvalidAttributeValue { .. }));
    assert_eq!(outer.len(), 1);
}

#[test]
fn validation_is_idempotent_on_valid_objects() {
    let mut role = Role::new("Editor").unwrap();
    role.set_attribute(Property::new("sys_lang", "en-us").unwrap())
        .unwrap();
    role.add_subject(Subject::new("editor1", SubjectKind::User).unwrap());

    for _ in 0..2 {
        let report = run_validation(&role, ValidationOptions::default()).unwrap();
        assert!(!report.has_errors());
        assert_eq!(report.issues.len(), 0);
    }
}

#[test]
fn validation_accumulates_across_siblings() {
    // Two invalid subject names; default policy keeps going after the
    // first error so both are reported.
    let doc = "<PSXRole id=\"2\" name=\"Editor\"><Subjects>\
        <PSXSubject id=\"0\" name=\"1bad\" type=\"user\"/>\
        <PSXSubject id=\"0\" name=\"2bad\" type=\"user\"/>\
        </Subjects></PSXRole>";
    let element = Element::parse_document(doc).unwrap();
    let role = Role::from_xml(&element, &mut ParentChain::new()).unwrap();

    let report = run_validation(&role, ValidationOptions::default()).unwrap();
    assert_eq!(report.errors().count(), 2);
    for issue in report.errors() {
        assert_eq!(issue.code, codes::INVALID_NAME);
        assert_eq!(issue.path, "PSXRole[2]/Subjects/PSXSubject");
    }
}

#[test]
fn fail_fast_unwinds_but_context_stays_consistent() {
    let doc = "<PSXRole id=\"2\" name=\"Editor\"><Subjects>\
        <PSXSubject id=\"0\" name=\"1bad\" type=\"user\"/>\
        <PSXSubject id=\"0\" name=\"2bad\" type=\"user\"/>\
        </Subjects></PSXRole>";
    let element = Element::parse_document(doc).unwrap();
    let role = Role::from_xml(&element, &mut ParentChain::new()).unwrap();

    let mut ctx = ValidationContext::with_options(ValidationOptions {
        fail_fast: true,
        max_errors: None,
    });
    let err = role.validate(&mut ctx).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    // Only the first sibling was reached, and all parent frames unwound.
    assert_eq!(ctx.error_count(), 1);
    assert_eq!(ctx.parent_depth(), 0);
}

#[test]
fn error_budget_produces_skip_but_allows_partial_validation() {
    let mut ctx = ValidationContext::with_options(ValidationOptions {
        fail_fast: false,
        max_errors: Some(1),
    });
    ctx.error("PSXParam", codes::INVALID_NAME, &["x"]).unwrap();

    // A component that honors Skip registers nothing further.
    let param = Param::new("ok", TextLiteral::new("v")).unwrap();
    param.validate(&mut ctx).unwrap();
    assert_eq!(ctx.error_count(), 1);

    // A component that ignores Skip may still validate partially; a valid
    // conditional adds no errors either way.
    let cond = Conditional::new(
        UserContext::new("User/Name").unwrap(),
        ConditionalOp::IsNull,
        None,
    )
    .unwrap();
    cond.validate(&mut ctx).unwrap();
    assert_eq!(ctx.error_count(), 1);
}

#[test]
fn structural_errors_never_panic_on_missing_fields() {
    let cases = [
        "<PSXParam/>",
        "<PSXParam name=\"p\"/>",
        "<PSXTextLiteral/>",
        "<PSXSubject id=\"0\"/>",
        "<PSXWorkflowInfo id=\"0\"/>",
        "<PSXConditional id=\"0\"/>",
    ];
    for doc in cases {
        let element = Element::parse_document(doc).unwrap();
        let mut chain = ParentChain::new();
        let failed = match element.name() {
            "PSXParam" => Param::from_xml(&element, &mut chain).is_err(),
            "PSXTextLiteral" => TextLiteral::from_xml(&element, &mut chain).is_err(),
            "PSXSubject" => Subject::from_xml(&element, &mut chain).is_err(),
            "PSXWorkflowInfo" => WorkflowInfo::from_xml(&element, &mut chain).is_err(),
            "PSXConditional" => Conditional::from_xml(&element, &mut chain).is_err(),
            other => panic!("unexpected case {other}"),
        };
        assert!(failed, "expected structural error for {doc}");
        assert_eq!(chain.len(), 0);
    }
}

#[test]
fn wrong_root_tag_is_unknown_node_type() {
    let element = Element::parse_document("<PSXProperty name=\"a\"><Value/></PSXProperty>").unwrap();
    let err = Param::from_xml(&element, &mut ParentChain::new()).unwrap_err();
    match err {
        Error::UnknownNodeType { expected, found } => {
            assert_eq!(expected, "PSXParam");
            assert_eq!(found, "PSXProperty");
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn copy_from_is_wholesale_replacement() {
    let mut target = ExtensionCall::new("local/old").unwrap();
    target.push_param(ExtensionParamValue::new(TextLiteral::new("stale")));

    let mut source = ExtensionCall::new("Java/global/makeLink").unwrap();
    source.push_param(ExtensionParamValue::new(NumericLiteral::new(1)));

    target.copy_from(&source);
    assert_eq!(target, source);
    assert_eq!(target.params().len(), 1);
    assert_eq!(target.params().get(0).unwrap().value().value_text(), "1");
}

#[test]
fn clone_is_independent_of_the_original() {
    let mut original = PropertySet::new();
    original
        .push(Property::new("alpha", "1").unwrap())
        .unwrap();
    let copy = original.clone();

    original.push(Property::new("beta", "2").unwrap()).unwrap();
    assert_eq!(copy.len(), 1);
    assert_eq!(original.len(), 2);
    assert_ne!(copy, original);
}

#[test]
fn report_json_carries_codes_and_args_together() {
    let doc = "<PSXWorkflowInfo id=\"0\" type=\"inclusionary\" values=\"-4\"/>";
    let element = Element::parse_document(doc).unwrap();
    let info = WorkflowInfo::from_xml(&element, &mut ParentChain::new()).unwrap();

    let report = run_validation(&info, ValidationOptions::default()).unwrap();
    let json = report.to_json();
    assert_eq!(json["issues"][0]["code"], codes::INVALID_ID_VALUE);
    assert_eq!(json["issues"][0]["args"][0], "-4");
    assert_eq!(json["issues"][0]["path"], "PSXWorkflowInfo");
}
