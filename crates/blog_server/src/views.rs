//! HTML pages for the blog. Every piece of user text goes through [`escape_html`].

use axum::response::Html;
use shared::domain::Post;

const SITE_TITLE: &str = "Blog";

pub const EMPTY_STATE: &str = "No posts yet.";

fn layout(page_title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{page_title} | {SITE_TITLE}</title>
</head>
<body>
    <nav>
        <a href="/">Home</a>
        <a href="/new">New post</a>
        <a href="/about">About</a>
    </nav>
    <main>
{body}
    </main>
</body>
</html>
"#
    ))
}

/// `None` renders the same page with no collection, used when the store could
/// not be read.
pub fn index_page(posts: Option<&[Post]>) -> Html<String> {
    let mut body = String::from("        <h1>Posts</h1>\n");
    match posts {
        Some(posts) if !posts.is_empty() => {
            for post in posts {
                body.push_str(&post_article(post));
            }
        }
        _ => body.push_str(&format!("        <p class=\"empty\">{EMPTY_STATE}</p>\n")),
    }
    layout("Home", &body)
}

fn post_article(post: &Post) -> String {
    format!(
        r#"        <article id="post-{id}">
            <h2>{title}</h2>
            <p>{content}</p>
            <form method="post" action="/delete/{id}">
                <button type="submit">Delete</button>
            </form>
        </article>
"#,
        id = post.id,
        title = escape_html(&post.title),
        content = escape_html(&post.content),
    )
}

pub fn about_page() -> Html<String> {
    layout(
        "About",
        "        <h1>About</h1>\n        <p>A small blog: write a post, read it on the front page, delete it when you are done.</p>\n",
    )
}

pub fn new_post_page() -> Html<String> {
    layout(
        "New post",
        r#"        <h1>New post</h1>
        <form method="post" action="/new">
            <label for="title">Title</label>
            <input id="title" name="title" type="text">
            <label for="content">Content</label>
            <textarea id="content" name="content"></textarea>
            <button type="submit">Publish</button>
        </form>
"#,
    )
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
