mod common;

use common::*;
use http::StatusCode;
use pjax_blocks::template::{RenderContext, TemplateError};
use pjax_blocks::{
    BlockSource, Decoration, PjaxBlock, PjaxError, PjaxTemplate, Request, Response, TemplateSource, View, X_PJAX_URL,
};

fn block(name: &str) -> Decoration {
    PjaxBlock::named(name).unwrap().into()
}

fn auto() -> Decoration {
    PjaxBlock::default().into()
}

fn render(view: &impl View, mut request: Request) -> Result<String, PjaxError> {
    view.call(&mut request)?.rendered_content(&engine())
}

// ---- Block capture

#[test]
fn test_normal_request_renders_whole_page() {
    let view = block("main").wrap(base_view);
    assert_eq!(render(&view, regular_request()).unwrap(), FULL_PAGE);
}

#[test]
fn test_named_block() {
    let view = block("main").wrap(base_view);
    assert_eq!(render(&view, pjax_request()).unwrap(), "I'm wearing orange galoshes");
}

#[test]
fn test_auto_block_from_container() {
    let view = auto().wrap(base_view);
    assert_eq!(render(&view, pjax_request()).unwrap(), "Some secondary content.");
}

#[test]
fn test_auto_block_with_title() {
    let view = Decoration::parse("@pjax_block(title_block='title')").unwrap().wrap(base_view);
    assert_eq!(
        render(&view, pjax_request()).unwrap(),
        "<title>Block Title</title>\nSome secondary content."
    );
}

#[test]
fn test_auto_block_without_container() {
    let view = auto().wrap(base_view);
    let request = Request::get("/").with_header(pjax_blocks::X_PJAX, "true").unwrap();
    assert!(matches!(render(&view, request), Err(PjaxError::NoBlockName)));
}

#[test]
fn test_auto_block_falls_back_to_query_parameter() {
    let view = auto().wrap(base_view);
    let request = Request::get("/?_pjax=%23main").with_header(pjax_blocks::X_PJAX, "true").unwrap();
    assert_eq!(render(&view, request).unwrap(), "I'm wearing orange galoshes");
}

#[test]
fn test_invalid_container() {
    let view = auto().wrap(base_view);
    let request = Request::get("/").pjax("#soviet .bloc").unwrap();
    assert!(matches!(render(&view, request), Err(PjaxError::InvalidSelector(_))));
}

#[test]
fn test_computed_block_none_renders_whole_page() {
    let view = Decoration::from(PjaxBlock::computed(|_| Ok(None))).wrap(base_view);
    assert_eq!(render(&view, pjax_request()).unwrap(), FULL_PAGE);
}

#[test]
fn test_computed_block() {
    let decoration = PjaxBlock::computed(|req| Ok(req.query().get("region").map(str::to_string)));
    let view = Decoration::from(decoration).wrap(base_view);
    let request = Request::get("/?region=secondary").pjax("#ignored").unwrap();
    assert_eq!(render(&view, request).unwrap(), "Some secondary content.");
}

#[test]
fn test_missing_block() {
    let view = block("main_missing").wrap(base_view);
    let err = render(&view, pjax_request()).unwrap_err();
    assert!(matches!(err, PjaxError::Template(TemplateError::BlockNotFound(name)) if name == "main_missing"));
}

// ---- Titles

fn titled_view(title_variable: Option<&str>, title_block: Option<&str>) -> impl View {
    let decoration = PjaxBlock::new(BlockSource::Fixed("main".into()), title_variable, title_block).unwrap();
    Decoration::from(decoration).wrap(|_: &mut Request| -> Result<Response, PjaxError> {
        Ok(base_response(test_template(), RenderContext::new().with("title", "Variable Title")))
    })
}

#[test]
fn test_title_variable() {
    assert_eq!(
        render(&titled_view(Some("title"), None), pjax_request()).unwrap(),
        "<title>Variable Title</title>\nI'm wearing orange galoshes"
    );
}

#[test]
fn test_title_variable_missing() {
    let err = render(&titled_view(Some("title_missing"), None), pjax_request()).unwrap_err();
    assert!(matches!(err, PjaxError::Template(TemplateError::TitleVariableNotFound(_))));
}

#[test]
fn test_title_block() {
    assert_eq!(
        render(&titled_view(None, Some("title")), pjax_request()).unwrap(),
        "<title>Block Title</title>\nI'm wearing orange galoshes"
    );
}

#[test]
fn test_title_block_missing() {
    let err = render(&titled_view(None, Some("title_missing")), pjax_request()).unwrap_err();
    assert!(matches!(err, PjaxError::Template(TemplateError::TitleBlockNotFound(_))));
}

#[test]
fn test_title_conflict() {
    let err = PjaxBlock::new(BlockSource::Fixed("main".into()), Some("title"), Some("title")).unwrap_err();
    assert!(matches!(err, PjaxError::Template(TemplateError::ConflictingTitle)));
}

// ---- Inheritance

#[test]
fn test_block_in_base_template() {
    let view = block("main").wrap(|_: &mut Request| -> Result<Response, PjaxError> {
        Ok(base_response(extends_template(), RenderContext::new().with("base_template", base_template())))
    });
    assert_eq!(render(&view, pjax_request()).unwrap(), "base block content");
}

#[test]
fn test_block_in_base_template_by_name() {
    let view = block("main").wrap(|_: &mut Request| -> Result<Response, PjaxError> {
        Ok(base_response(extends_template(), RenderContext::new().with("base_template", "file_base.html")))
    });
    assert_eq!(render(&view, pjax_request()).unwrap(), "file base block content");
}

// ---- Headers and response kinds

#[test]
fn test_url_header() {
    let view = auto().wrap(base_view);
    let mut request = Request::get("/page?x=1&_pjax=%23secondary").pjax("#secondary").unwrap();
    let response = view.call(&mut request).unwrap();
    assert_eq!(response.headers()[X_PJAX_URL], "/page?x=1");
    assert_eq!(request.full_path(), "/page?x=1");
}

#[test]
fn test_no_url_header_for_regular_request() {
    let view = auto().wrap(base_view);
    let response = view.call(&mut regular_request()).unwrap();
    assert!(!response.headers().contains_key(X_PJAX_URL));
}

#[test]
fn test_redirect_header() {
    let view = auto().wrap(|_: &mut Request| Response::redirect("/redirected/"));
    let response = view.call(&mut pjax_request()).unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[X_PJAX_URL], "/redirected/");
}

#[test]
fn test_non_deferred_response() {
    let view = auto().wrap(|_: &mut Request| -> Result<Response, PjaxError> {
        Ok(Response::content("already rendered"))
    });
    assert!(matches!(view.call(&mut pjax_request()), Err(PjaxError::NotDeferred)));
    // Regular requests are not inspected.
    assert!(view.call(&mut regular_request()).is_ok());
}

#[test]
fn test_view_sees_stripped_query() {
    let view = auto().wrap(|req: &mut Request| {
        assert!(!req.query().contains("_pjax"));
        assert_eq!(req.query_string(), "");
        base_view(req)
    });
    view.call(&mut pjax_request()).unwrap();
}

// ---- Template override

#[test]
fn test_template_auto() {
    let view = Decoration::from(PjaxTemplate::default())
        .wrap(|_: &mut Request| -> Result<Response, PjaxError> {
            Ok(base_response("test_template.html", RenderContext::new()))
        });
    let response = view.call(&mut pjax_request()).unwrap();
    let template = response.template_response().unwrap().template();
    assert!(matches!(
        template,
        TemplateSource::Names(names) if names == &["test_template-pjax=secondary.html", "test_template.html"]
    ));
    assert_eq!(response.rendered_content(&engine()).unwrap(), "secondary fragment");
}

#[test]
fn test_template_static() {
    let view = Decoration::from(PjaxTemplate::named("static_template.html").unwrap()).wrap(base_view);
    let response = view.call(&mut pjax_request()).unwrap();
    assert_eq!(response.rendered_content(&engine()).unwrap(), "static");
}

#[test]
fn test_template_computed_empty() {
    let view = Decoration::from(PjaxTemplate::computed(|_, _| Ok(Vec::new()))).wrap(base_view);
    assert!(matches!(view.call(&mut pjax_request()), Err(PjaxError::EmptyTemplate)));
}

#[test]
fn test_template_auto_on_document() {
    let view = Decoration::from(PjaxTemplate::default()).wrap(base_view);
    assert!(matches!(view.call(&mut pjax_request()), Err(PjaxError::TemplateNotNamed)));
}

#[test]
fn test_stacked_decorations() {
    // The template swap runs first, then the block capture applies to the
    // swapped template.
    let inner = Decoration::from(PjaxTemplate::named("test_template.html").unwrap())
        .wrap(|_: &mut Request| -> Result<Response, PjaxError> {
            Ok(base_response("other.html", RenderContext::new()))
        });
    let view = block("secondary").wrap(inner);
    assert_eq!(render(&view, pjax_request()).unwrap(), "Some secondary content.");
}
