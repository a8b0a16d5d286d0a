//! HTML rendering
//!
//! Markup for the posts page. Every piece of entity text goes through
//! [`escape_html`]; only markup built here is injected as-is.

use super::posts::{CommentsView, PostCard};
use crate::model::Comment;

/// Placeholder shown when the merged post list is empty
pub const NO_POSTS: &str = "No posts found.";

/// Placeholder shown for an expanded post without comments
pub const NO_COMMENTS: &str = "No comments.";

/// Escape `&`, `<`, `>`, quotes and backticks for safe injection into markup
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render the posts container
pub fn render_posts(cards: &[PostCard]) -> String {
    if cards.is_empty() {
        return format!("<div>{}</div>\n", NO_POSTS);
    }

    cards.iter().map(render_post_card).collect()
}

/// Render a single post card with its action buttons and comments panel
pub fn render_post_card(card: &PostCard) -> String {
    let id = card.post.id;
    let hidden = if card.visible { "" } else { r#" style="display:none""# };

    format!(
        r#"<div class="post-card" data-id="{id}"{hidden}>
  <h3>{title}</h3>
  <p>{body}</p>
  <div class="post-actions">
    <button class="btn btn-small btn-comments" data-id="{id}"><i class="fa fa-comments"></i> Comments</button>
    <button class="btn btn-small btn-edit" data-id="{id}"><i class="fa fa-pen"></i> Edit</button>
    <button class="btn btn-small btn-delete" data-id="{id}"><i class="fa fa-trash"></i> Delete</button>
  </div>
  {comments}
</div>
"#,
        id = id,
        hidden = hidden,
        title = escape_html(&card.post.title),
        body = escape_html(&card.post.body),
        comments = render_comments(card.comments.view()),
    )
}

/// Render the comments panel of a card
pub fn render_comments(view: CommentsView<'_>) -> String {
    match view {
        CommentsView::Hidden => r#"<div class="comments" style="display:none"></div>"#.to_string(),
        CommentsView::Empty => format!(r#"<div class="comments"><div>{}</div></div>"#, NO_COMMENTS),
        CommentsView::List(comments) => {
            let items: String = comments.iter().map(render_comment).collect();
            format!(r#"<div class="comments">{}</div>"#, items)
        }
    }
}

fn render_comment(comment: &Comment) -> String {
    format!(
        r#"<div class="comment"><strong>{}</strong> <div class="comment-email">{}</div><p>{}</p></div>"#,
        escape_html(&comment.name),
        escape_html(&comment.email),
        escape_html(&comment.body)
    )
}
