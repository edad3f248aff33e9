/// HTML rendering with contextual output encoding
///
/// Pages are built by string assembly; every value that originates from a
/// request or from storage passes through `escape_html` on its way into
/// markup. Handlers never concatenate raw input into a page.

use chrono::{DateTime, Utc};
use taskforge_shared::models::post::{Post, PostComment};

/// Escapes a string for safe interpolation into HTML text or attributes
///
/// Escapes `&`, `<`, `>`, `"`, and `'`. Must be applied to every
/// request-derived or stored value; markup characters in user content
/// render literally.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn format_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M").to_string()
}

/// Wraps page content in the shared chrome
fn layout(title: &str, nav: &str, content: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} - TaskForge Blog</title>\n</head>\n<body>\n\
         <header><h1>TaskForge Blog</h1><nav>{}</nav></header>\n\
         <main>\n{}\n</main>\n</body>\n</html>\n",
        escape_html(title),
        nav,
        content
    )
}

fn nav_links(username: Option<&str>) -> String {
    match username {
        Some(name) => format!(
            "<a href=\"/\">Home</a> <span>Signed in as {}</span> \
             <a href=\"/login?logout=1\">Log out</a>",
            escape_html(name)
        ),
        None => "<a href=\"/\">Home</a> <a href=\"/login\">Log in</a>".to_string(),
    }
}

fn render_comment(comment: &PostComment) -> String {
    format!(
        "<li><strong>{}</strong> <time>{}</time><p>{}</p></li>",
        escape_html(&comment.author),
        format_date(&comment.created_at),
        escape_html(&comment.comment_text)
    )
}

fn render_post(post: &Post, comments: &[PostComment]) -> String {
    let comment_items: String = comments.iter().map(render_comment).collect();

    format!(
        "<article>\n<h2>{}</h2>\n<time>{}</time>\n<p>{}</p>\n\
         <section>\n<h3>Comments ({})</h3>\n<ul>{}</ul>\n\
         <form method=\"post\" action=\"/\">\n\
         <input type=\"hidden\" name=\"post_id\" value=\"{}\">\n\
         <input type=\"text\" name=\"author\" placeholder=\"Name (optional)\">\n\
         <textarea name=\"comment\" required></textarea>\n\
         <button type=\"submit\">Comment</button>\n</form>\n</section>\n</article>",
        escape_html(&post.title),
        format_date(&post.created_at),
        escape_html(&post.content),
        comments.len(),
        comment_items,
        post.id
    )
}

/// Renders the front page: search box, optional echoed query, posts with
/// their comments
pub fn index_page(
    username: Option<&str>,
    search_query: Option<&str>,
    posts: &[(Post, Vec<PostComment>)],
) -> String {
    let mut content = String::from(
        "<form method=\"get\" action=\"/\">\
         <input type=\"text\" name=\"search\" placeholder=\"Search posts\">\
         <button type=\"submit\">Search</button></form>\n",
    );

    if let Some(query) = search_query {
        content.push_str(&format!(
            "<p>Results for: {}</p>\n",
            escape_html(query)
        ));
    }

    if posts.is_empty() {
        content.push_str("<p>No posts found.</p>\n");
    } else {
        for (post, comments) in posts {
            content.push_str(&render_post(post, comments));
            content.push('\n');
        }
    }

    layout("Home", &nav_links(username), &content)
}

/// Renders the login page, optionally with a failure notice
///
/// The notice is a fixed message chosen by the handler, never echoed input.
pub fn login_page(notice: Option<&str>) -> String {
    let mut content = String::new();

    if let Some(notice) = notice {
        content.push_str(&format!("<p>{}</p>\n", escape_html(notice)));
    }

    content.push_str(
        "<form method=\"post\" action=\"/login\">\n\
         <label>Username <input type=\"text\" name=\"username\" required></label>\n\
         <label>Password <input type=\"password\" name=\"password\" required></label>\n\
         <button type=\"submit\">Log in</button>\n</form>\n",
    );

    layout("Log in", &nav_links(None), &content)
}

/// Renders a minimal error page
pub fn error_page(status: u16, message: &str) -> String {
    let content = format!("<p>{} - {}</p>", status, escape_html(message));
    layout("Error", &nav_links(None), &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_escape_html_special_characters() {
        assert_eq!(
            escape_html("<script>alert('XSS')</script>"),
            "&lt;script&gt;alert(&#x27;XSS&#x27;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("say \"hi\""), "say &quot;hi&quot;");
    }

    #[test]
    fn test_escape_html_passes_plain_text() {
        assert_eq!(escape_html("hello world"), "hello world");
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn test_search_echo_is_escaped() {
        let page = index_page(None, Some("<img src=x onerror=alert(1)>"), &[]);
        assert!(!page.contains("<img src=x"));
        assert!(page.contains("&lt;img src=x onerror=alert(1)&gt;"));
    }

    #[test]
    fn test_stored_comment_is_escaped() {
        let post = Post {
            id: Uuid::new_v4(),
            title: "First post".to_string(),
            content: "Hello".to_string(),
            created_at: Utc::now(),
        };
        let comment = PostComment {
            id: Uuid::new_v4(),
            post_id: post.id,
            author: "<b>bold</b>".to_string(),
            comment_text: "<script>document.cookie</script>".to_string(),
            created_at: Utc::now(),
        };

        let page = index_page(None, None, &[(post, vec![comment])]);
        assert!(!page.contains("<script>document.cookie"));
        assert!(page.contains("&lt;script&gt;document.cookie&lt;/script&gt;"));
        assert!(page.contains("&lt;b&gt;bold&lt;/b&gt;"));
    }

    #[test]
    fn test_post_title_is_escaped() {
        let post = Post {
            id: Uuid::new_v4(),
            title: "Tips & <tricks>".to_string(),
            content: "Body".to_string(),
            created_at: Utc::now(),
        };

        let page = index_page(None, None, &[(post, vec![])]);
        assert!(page.contains("Tips &amp; &lt;tricks&gt;"));
    }

    #[test]
    fn test_signed_in_username_is_escaped() {
        let page = index_page(Some("eve<svg/onload=1>"), None, &[]);
        assert!(!page.contains("<svg/onload=1>"));
    }
}
