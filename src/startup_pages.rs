//! Self-contained inline documents shown while the server is not serving its
//! own UI: a loading page during startup and error pages after poll
//! exhaustion. Rendered as `data:` URLs the way the window controller
//! navigates everywhere else.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::translations::Translations;

const PAGE_FONT: &str =
    "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif";

pub(crate) fn loading_page_html(translations: &Translations) -> String {
    let title = translations.translate("app.starting", None, &[]);
    let description = translations.translate("app.startingDescription", None, &[]);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>n8n - {title}</title>
<style>
body {{
	font-family: {PAGE_FONT};
	display: flex;
	flex-direction: column;
	align-items: center;
	justify-content: center;
	height: 100vh;
	margin: 0;
	background: #f5f5f5;
	color: #333;
}}
h1 {{ margin-bottom: 20px; }}
.spinner {{
	border: 4px solid #f3f3f3;
	border-top: 4px solid #3498db;
	border-radius: 50%;
	width: 40px;
	height: 40px;
	animation: spin 1s linear infinite;
	margin: 20px auto;
}}
@keyframes spin {{
	0% {{ transform: rotate(0deg); }}
	100% {{ transform: rotate(360deg); }}
}}
</style>
</head>
<body>
<h1>{title}</h1>
<div class="spinner"></div>
<p>{description}</p>
</body>
</html>"#
    )
}

/// Error page for a server that kept answering with non-success statuses.
pub(crate) fn erroring_error_page_html(translations: &Translations) -> String {
    let title = translations.translate("app.error", None, &[]);
    let message = translations.translate("app.errorDescription", None, &[]);
    error_page_html(&title, &message)
}

/// Error page for a server that never became reachable within the budget.
pub(crate) fn unreachable_error_page_html(translations: &Translations, attempts: u32) -> String {
    let title = translations.translate("app.error", None, &[]);
    let message = translations.translate(
        "app.errorAfterAttempts",
        None,
        &[("attempts", attempts.to_string())],
    );
    error_page_html(&title, &message)
}

fn error_page_html(title: &str, message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>n8n - {title}</title>
<style>
body {{
	font-family: {PAGE_FONT};
	display: flex;
	flex-direction: column;
	align-items: center;
	justify-content: center;
	height: 100vh;
	margin: 0;
	background: #f5f5f5;
	color: #d32f2f;
}}
</style>
</head>
<body>
<h1>{title}</h1>
<p>{message}</p>
</body>
</html>"#
    )
}

pub(crate) fn data_url(html: &str) -> String {
    format!(
        "data:text/html;charset=utf-8,{}",
        utf8_percent_encode(html, NON_ALPHANUMERIC)
    )
}
