//! PJAX fragment responses for server-rendered pages.
//!
//! A PJAX client asks for a page with an `X-PJAX` header and names the
//! region it wants to replace in `X-PJAX-Container`. Instead of rendering
//! the whole page, a decorated view renders only the block of that name,
//! optionally prefixed with a `<title>` element.
//!
//! Decorations are applied either directly to views ([`Decoration::wrap`])
//! or by URL through a [`Middleware`] built from a [`PjaxConfig`].
//!
//! # Example
//!
//! ```
//! use pjax_blocks::{Decoration, PjaxBlock, PjaxError, Request, Response, View};
//! use pjax_blocks::template::{Document, Engine, MemoryLoader, RenderContext};
//!
//! let page = Document::build(|b| {
//!     b.block("title", |b| b.text("Home"))
//!         .text("<nav/>")
//!         .block("main", |b| b.text("hello ").var("name"))
//! });
//! let engine = Engine::new(MemoryLoader::new().with("page.html", page));
//!
//! fn home(_: &mut Request) -> Result<Response, PjaxError> {
//!     Ok(Response::template("page.html", RenderContext::new().with("name", "world")))
//! }
//!
//! let view = Decoration::parse("@pjax_block(title_block='title')").unwrap().wrap(home);
//!
//! let mut request = Request::get("/").pjax("#main").unwrap();
//! let response = view.call(&mut request).unwrap();
//! assert_eq!(response.rendered_content(&engine).unwrap(), "<title>Home</title>\nhello world");
//!
//! let response = view.call(&mut Request::get("/")).unwrap();
//! assert_eq!(response.rendered_content(&engine).unwrap(), "Home<nav/>hello world");
//! ```

pub use pjax_blocks_config as config_parser;
pub use pjax_blocks_template as template;

pub mod config;
pub mod decorator;
pub mod error;
pub mod middleware;
pub mod report;
pub mod request;
pub mod response;
pub mod utils;

pub use config::{DecoratorSource, PjaxConfig};
pub use decorator::{BlockSource, Decorated, Decoration, PjaxBlock, PjaxTemplate, TemplateChoice, View};
pub use error::PjaxError;
pub use middleware::{Middleware, RouteRule};
pub use request::{QueryDict, Request};
pub use response::{Body, Response, TemplateResponse, TemplateSource};
pub use utils::{
    is_pjax, pjax_container, pjaxify_template_path, pjaxify_template_var, pjaxify_template_var_with_container,
    strip_pjax_parameter, strip_pjax_qs_parameter, transform_template_var, PJAX_PARAM, X_PJAX, X_PJAX_CONTAINER,
    X_PJAX_URL,
};
