//! Shared templates, views and requests.

#![allow(dead_code)]

use pjax_blocks::template::{Document, Engine, MemoryLoader, ParentRef, RenderContext};
use pjax_blocks::{PjaxError, Request, Response, TemplateSource};
use std::sync::Arc;

pub const FULL_PAGE: &str = "Block Title\
                             Some text outside the main block.\
                             I'm wearing orange galoshes\
                             Some secondary content.\
                             More text outside the main block.";

pub fn test_template() -> Arc<Document> {
    Document::named("test_template.html", |b| {
        b.block("title", |b| b.text("Block Title"))
            .text("Some text outside the main block.")
            .container(|b| b.block("main", |b| b.text("I'm wearing ").var("colour").text(" ").var("footwear")))
            .block("secondary", |b| b.text("Some secondary content."))
            .text("More text outside the main block.")
    })
}

pub fn base_template() -> Arc<Document> {
    Document::build(|b| b.block("main", |b| b.text("base block content")))
}

pub fn extends_template() -> Arc<Document> {
    Document::build(|b| b.extends(ParentRef::Variable("base_template".into()), |b| b))
}

pub fn engine() -> Engine {
    let loader = MemoryLoader::new()
        .with("test_template.html", test_template())
        .with("test_template-pjax=secondary.html", Document::build(|b| b.text("secondary fragment")))
        .with("static_template.html", Document::build(|b| b.text("static")))
        .with("file_base.html", Document::build(|b| b.block("main", |b| b.text("file base block content"))));
    Engine::new(loader)
}

/// A deferred response for `template`, with the colour and footwear every
/// test page expects plus `extra`.
pub fn base_response(template: impl Into<TemplateSource>, extra: RenderContext) -> Response {
    let mut ctx = RenderContext::new().with("colour", "orange").with("footwear", "galoshes");
    ctx.extend(extra);
    Response::template(template, ctx)
}

pub fn base_view(_: &mut Request) -> Result<Response, PjaxError> {
    Ok(base_response(test_template(), RenderContext::new()))
}

pub fn regular_request() -> Request {
    Request::get("/")
}

pub fn pjax_request() -> Request {
    Request::get("/?_pjax=%23secondary").pjax("#secondary").unwrap()
}
