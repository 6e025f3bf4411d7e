use super::*;
use crate::source::{Source, SourceLocation, SourceRange};

#[test]
fn child_messages_nest_under_parent() {
    let src = Source::new("x.fg", "a + b");
    let mut ctx = MessageContext::new();
    let msg = ctx.emit_coded(
        SourceRange::point(SourceLocation::at_offset(src.clone(), 0)),
        Severity::ERROR,
        "ETY005",
        "implicit cast required",
    );
    msg.suggest(
        SourceRange::point(SourceLocation::at_offset(src, 0)),
        "use `as` to cast explicitly",
    );

    let messages = ctx.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].children.len(), 1);
    assert_eq!(messages[0].code, Some("ETY005"));
}
