//! Error page shown after an unhandled failure redirected the browser.

use actix_web::cookie::Cookie;
use actix_web::{HttpRequest, HttpResponse, http::header::ContentType, web};

use crate::middleware::exception::ERROR_DETAIL_COOKIE;
use crate::state::AppState;

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// GET /error
///
/// Renders the detail stashed by the error middleware and clears it.
/// Production never shows the detail, whatever the cookie holds.
pub async fn error_page(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let detail = req.cookie(ERROR_DETAIL_COOKIE);

    let detail_html = detail
        .as_ref()
        .filter(|_| state.environment.is_development())
        .map(|c| format!("<pre class=\"detail\">{}</pre>", escape_html(c.value())))
        .unwrap_or_default();

    let body = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>Error</title></head>\n\
         <body>\n<h1>Something went wrong</h1>\n\
         <p>An unexpected error occurred while processing your request. Please try again later.</p>\n\
         {}\n<p><a href=\"/\">Back to the home page</a></p>\n</body>\n</html>\n",
        detail_html
    );

    let mut response = HttpResponse::Ok();
    response.content_type(ContentType::html());
    if detail.is_some() {
        let mut removal = Cookie::build(ERROR_DETAIL_COOKIE, "").path("/").finish();
        removal.make_removal();
        response.cookie(removal);
    }
    response.body(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>alert('x') & \"y\"</script>"),
            "&lt;script&gt;alert(&#39;x&#39;) &amp; &quot;y&quot;&lt;/script&gt;"
        );
    }
}
