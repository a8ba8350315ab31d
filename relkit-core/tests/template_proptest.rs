use proptest::prelude::*;
use relkit_core::TemplateContext;
use serde_json::json;

fn context() -> TemplateContext {
    TemplateContext::new(json!({ "meta": { "out": "dist" } }))
}

proptest! {
    #[test]
    fn text_without_placeholders_is_unchanged(text in "[^<]*") {
        prop_assert_eq!(context().render(&text).unwrap(), text);
    }

    #[test]
    fn placeholder_is_replaced_wherever_it_appears(
        prefix in "[a-z /._-]{0,20}",
        suffix in "[a-z /._-]{0,20}",
    ) {
        let template = format!("{}<%= meta.out %>{}", prefix, suffix);
        prop_assert_eq!(
            context().render(&template).unwrap(),
            format!("{}dist{}", prefix, suffix)
        );
    }
}
