// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTML rendering for the server surface.
//!
//! Plain `format!`-assembled markup. The pages carry the stable hooks the
//! harness waits on: the `Open assignments` heading, the course filter
//! controls, `#add-comment`, and the hidden `#comment-form-wrapper`.

use studium_persistence::{AssignmentData, CommentData, CourseData};

/// Escapes text for embedding in HTML.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Renders the login page, optionally with an error banner.
pub fn login_page(error: Option<&str>, next: Option<&str>) -> String {
    let banner = error.map_or_else(String::new, |message| {
        format!("<div class=\"errornote\">{}</div>\n", escape(message))
    });
    let next_field = next.map_or_else(String::new, |target| {
        format!(
            "<input type=\"hidden\" name=\"next\" value=\"{}\">\n",
            escape(target)
        )
    });

    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Sign in</title></head>\n<body>\n\
         <h1>Sign in</h1>\n{banner}\
         <form id=\"login-form\" method=\"post\" action=\"/login/\">\n\
         <input type=\"text\" name=\"username\">\n\
         <input type=\"password\" name=\"password\">\n\
         <input type=\"hidden\" name=\"verification_token\" value=\"\">\n\
         {next_field}\
         <button id=\"submit-login\" type=\"submit\">Sign in</button>\n\
         </form>\n</body>\n</html>\n"
    )
}

/// Renders the assignments listing with the course filter.
pub fn assignments_page(
    courses: &[CourseData],
    assignments: &[AssignmentData],
    selected_course: Option<i64>,
) -> String {
    let mut options = String::from("<option value=\"\">All courses</option>\n");
    for course in courses {
        let selected = if selected_course == Some(course.course_id) {
            " selected"
        } else {
            ""
        };
        options.push_str(&format!(
            "<option value=\"{}\"{selected}>{}</option>\n",
            course.course_id,
            escape(&course.meta_name)
        ));
    }

    let body = if assignments.is_empty() {
        "<div class=\"empty-state\">No assignments yet.</div>\n".to_string()
    } else {
        let mut list = String::from("<ul id=\"assignment-list\">\n");
        for assignment in assignments {
            list.push_str(&format!(
                "<li><a href=\"/learning/assignments/{}/\">{}</a></li>\n",
                assignment.assignment_id,
                escape(&assignment.title)
            ));
        }
        list.push_str("</ul>\n");
        list
    };

    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Assignments</title></head>\n<body>\n\
         <h1>Open assignments</h1>\n\
         <form id=\"course-filter\" method=\"get\" action=\"/learning/assignments/\">\n\
         <select name=\"course\">\n{options}</select>\n\
         <input type=\"submit\" name=\"apply\" value=\"1\">\n\
         </form>\n\
         {body}</body>\n</html>\n"
    )
}

/// Renders the assignment detail page with the comment form.
pub fn assignment_detail_page(assignment: &AssignmentData, comments: &[CommentData]) -> String {
    let mut rendered_comments = String::new();
    for comment in comments {
        rendered_comments.push_str(&format!(
            "<div class=\"comment\">{}</div>\n",
            escape(&comment.body)
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>{title}</title></head>\n<body>\n\
         <h1>{title}</h1>\n\
         <button id=\"add-comment\" type=\"button\">Add comment</button>\n\
         <div id=\"comment-form-wrapper\" hidden>\n\
         <form method=\"post\" action=\"/learning/assignments/{id}/comments/\">\n\
         <textarea name=\"body\"></textarea>\n\
         <button id=\"submit-id-comment-save\" type=\"submit\">Save</button>\n\
         </form>\n</div>\n\
         <div id=\"comments\">\n{rendered_comments}</div>\n\
         </body>\n</html>\n",
        title = escape(&assignment.title),
        id = assignment.assignment_id,
    )
}
