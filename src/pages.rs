//! HTML pages. Deliberately plain: a shared layout, forms, and lists.

use axum::response::Html;
use occasio::models::{Event, UserId};

pub fn welcome(flashes: &[String]) -> Html<String> {
    layout(
        "Welcome",
        None,
        flashes,
        "<h1>Occasio</h1>\
         <p>Plan events and see who is coming.</p>\
         <p><a href=\"/login\">Log in</a> or <a href=\"/register\">create an account</a>.</p>",
    )
}

pub fn login(flashes: &[String]) -> Html<String> {
    layout(
        "Log in",
        None,
        flashes,
        &format!(
            "<h1>Log in</h1>{}<p>No account yet? <a href=\"/register\">Register</a>.</p>",
            credentials_form("/login", "Log in")
        ),
    )
}

pub fn register(flashes: &[String]) -> Html<String> {
    layout(
        "Register",
        None,
        flashes,
        &format!(
            "<h1>Register</h1>{}<p>Already registered? <a href=\"/login\">Log in</a>.</p>",
            credentials_form("/register", "Register")
        ),
    )
}

pub fn home_feed(
    user: &UserId,
    events: &[Event],
    search: &str,
    flashes: &[String],
) -> Html<String> {
    let mut body = format!(
        "<h1>Hello, {}</h1>\
         <form method=\"get\" action=\"/home_feed\">\
         <input type=\"search\" name=\"search\" value=\"{}\" placeholder=\"Search by title\">\
         <button type=\"submit\">Search</button></form>\
         <p><a href=\"/create_event\">Create an event</a></p>",
        escape(user.as_str()),
        escape(search)
    );
    if events.is_empty() {
        body.push_str("<p>No events found.</p>");
    } else {
        body.push_str(&event_list(events));
    }
    layout("Events", Some(user), flashes, &body)
}

pub fn create_event(user: &UserId, flashes: &[String]) -> Html<String> {
    layout(
        "Create an event",
        Some(user),
        flashes,
        "<h1>Create an event</h1>\
         <form method=\"post\" action=\"/create_event\">\
         <label>Title <input name=\"title\" required></label>\
         <label>Description <textarea name=\"description\"></textarea></label>\
         <label>Date <input name=\"date\"></label>\
         <label>Location <input name=\"location\"></label>\
         <button type=\"submit\">Create</button></form>",
    )
}

pub fn rsvp(user: &UserId, event: &Event, flashes: &[String]) -> Html<String> {
    let mut body = event_details(event);
    if event.is_attended_by(user) {
        body.push_str("<p>You are attending this event.</p>");
    } else {
        body.push_str(&format!(
            "<form method=\"post\" action=\"/rsvp/{}\"><button type=\"submit\">RSVP</button></form>",
            event.id
        ));
    }
    layout(&event.title, Some(user), flashes, &body)
}

pub fn rsvped_events(user: &UserId, events: &[Event], flashes: &[String]) -> Html<String> {
    let mut body = String::from("<h1>Your RSVPs</h1>");
    if events.is_empty() {
        body.push_str("<p>You have not RSVP'd to any events yet.</p>");
    } else {
        body.push_str(&event_list(events));
    }
    layout("Your RSVPs", Some(user), flashes, &body)
}

fn layout(title: &str, user: Option<&UserId>, flashes: &[String], body: &str) -> Html<String> {
    let nav = match user {
        Some(_) => {
            "<a href=\"/home_feed\">Events</a> \
             <a href=\"/rsvped_events\">My RSVPs</a> \
             <a href=\"/logout\">Log out</a>"
        }
        None => "<a href=\"/\">Home</a>",
    };
    let mut page = format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
         <title>{} - Occasio</title></head><body><nav>{nav}</nav>",
        escape(title)
    );
    if !flashes.is_empty() {
        page.push_str("<ul class=\"flashes\">");
        for message in flashes {
            page.push_str(&format!("<li>{}</li>", escape(message)));
        }
        page.push_str("</ul>");
    }
    page.push_str("<main>");
    page.push_str(body);
    page.push_str("</main></body></html>");
    Html(page)
}

fn credentials_form(action: &str, submit: &str) -> String {
    format!(
        "<form method=\"post\" action=\"{action}\">\
         <label>Username <input name=\"username\" required></label>\
         <label>Password <input type=\"password\" name=\"password\" required></label>\
         <button type=\"submit\">{submit}</button></form>"
    )
}

fn event_list(events: &[Event]) -> String {
    let mut list = String::from("<ul class=\"events\">");
    for event in events {
        list.push_str(&format!(
            "<li><a href=\"/rsvp/{}\">{}</a> {} at {} by {} ({} attending)</li>",
            event.id,
            escape(&event.title),
            escape(&event.date),
            escape(&event.location),
            escape(event.creator.as_str()),
            event.attendees.len()
        ));
    }
    list.push_str("</ul>");
    list
}

fn event_details(event: &Event) -> String {
    format!(
        "<h1>{}</h1><p>{}</p>\
         <dl><dt>Date</dt><dd>{}</dd><dt>Location</dt><dd>{}</dd>\
         <dt>Created by</dt><dd>{}</dd><dt>Attending</dt><dd>{}</dd></dl>",
        escape(&event.title),
        escape(&event.description),
        escape(&event.date),
        escape(&event.location),
        escape(event.creator.as_str()),
        event.attendees.len()
    )
}

fn escape(text: &str) -> String {
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
