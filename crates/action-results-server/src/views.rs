// File: src/views.rs
// Purpose: Maud views, the site layout and the ViewComponentExample component

use action_results::{ViewContext, ViewEngine};
use maud::{html, Markup, DOCTYPE};

/// Every view the Home controller renders.
pub fn engine() -> ViewEngine {
    ViewEngine::new()
        .view("Home/Index", index)
        .view("Home/AboutUs", about_us)
        .view("Home/PartialViewResult", partial)
        .layout(layout)
        .component("ViewComponentExample", view_component_example)
}

fn layout(view: &ViewContext<'_>, body: Markup) -> Markup {
    let title = view.action.action().unwrap_or("Home");
    html! {
        (DOCTYPE)
        html lang="tr" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - AspNetCoreActionResultsDemo" }
                link rel="stylesheet" href="/css/site.css";
            }
            body {
                nav {
                    a href="/" { "Home" }
                    a href="/Home/IndexWithName" { "About" }
                    a href="/Home/JsonResult" { "Json" }
                }
                div class="container body-content" {
                    (body)
                    hr;
                    footer { p { "© Action Results Demo" } }
                }
            }
        }
    }
}

fn index(_view: &ViewContext<'_>) -> Markup {
    html! {
        h1 { "Action Results" }
        p { "Each link below returns a different kind of action result." }
        ul {
            @for action in ACTIONS {
                li { a href={ "/Home/" (action) } { (action) } }
            }
        }
    }
}

fn about_us(view: &ViewContext<'_>) -> Markup {
    html! {
        h2 { "Hakkımızda" }
        p { "Rendered through View(\"AboutUs\") from " (view.action.action().unwrap_or("an action")) "." }
    }
}

fn partial(_view: &ViewContext<'_>) -> Markup {
    html! {
        div class="partial" {
            p { "PartialViewResult: rendered without the layout." }
        }
    }
}

fn view_component_example(_view: &ViewContext<'_>) -> Markup {
    html! {
        div class="view-component" { "ViewComponentExample" }
    }
}

const ACTIONS: &[&str] = &[
    "IndexWithName",
    "PartialViewResult",
    "ViewComponentResult",
    "JsonResult",
    "ContentResult",
    "EmptyResult",
    "BadRequestResult",
    "BadRequestObjectActionResult",
    "NotFoundActionResult",
    "NotFoundObjectActionResult",
    "ObjectResult",
    "SuccessResult",
    "OkObjectResult",
    "NoContentResult",
    "StatusCodeResult?durumKodu=418",
    "StatusCodeWithObject",
    "CreatedActionResult",
    "CreatedAtActionActionResult",
    "CreatedAtRouteActionResult",
    "AcceptedActionResult",
    "AcceptedAtActionActionResult",
    "AcceptedAtRouteActionResult",
    "UnsupportedMediaTypeResult",
    "UnauthorizedResult",
    "RedirectResult",
    "RedirectActionResult",
    "RedirectToRouteResult",
    "LocalRedirectResult",
    "FileResult",
    "FileStreamActionResult",
    "FileContentResult",
    "VirtualFileResult",
    "PhysicalFileResult",
    "JavascriptResult",
];

#[cfg(test)]
mod tests {
    use super::*;
    use action_results::ActionContext;

    #[test]
    fn test_index_lists_actions() {
        let ctx = ActionContext::default().with_action("Home", "Index");
        let markup = engine().render("Index", &ctx, None, true).unwrap().into_string();
        assert!(markup.starts_with("<!DOCTYPE html>"));
        assert!(markup.contains(r#"<a href="/Home/JavascriptResult">JavascriptResult</a>"#));
        assert!(markup.contains("<title>Index - AspNetCoreActionResultsDemo</title>"));
    }

    #[test]
    fn test_partial_has_no_layout() {
        let ctx = ActionContext::default().with_action("Home", "PartialViewResult");
        let markup = engine()
            .render("PartialViewResult", &ctx, None, false)
            .unwrap()
            .into_string();
        assert!(markup.starts_with(r#"<div class="partial">"#));
    }
}
