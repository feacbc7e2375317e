use axum::{
    extract::{Path, Query, State},
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use occasio::{
    events::{self, NewEvent},
    models::{EventId, RsvpOutcome},
    rsvp as rsvps,
};
use serde::Deserialize;

use crate::{
    error::AppError,
    pages,
    session::{expired_cookie, LoggedIn, Session},
    state::{SharedState, State as AppState},
};

#[derive(Deserialize)]
pub struct Credentials {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
pub struct FeedQuery {
    search: Option<String>,
}

#[derive(Deserialize)]
pub struct EventForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    location: String,
}

pub async fn home(
    State(state): State<SharedState>,
    mut session: Session,
) -> Result<Response, AppError> {
    if session.username().is_some() {
        return Ok(Redirect::to("/home_feed").into_response());
    }
    let flashes = session.take_flashes();
    session.respond(&state.signer, pages::welcome(&flashes))
}

pub async fn login_form(
    State(state): State<SharedState>,
    mut session: Session,
) -> Result<Response, AppError> {
    let flashes = session.take_flashes();
    session.respond(&state.signer, pages::login(&flashes))
}

pub async fn login_submit(
    State(state): State<SharedState>,
    mut session: Session,
    Form(form): Form<Credentials>,
) -> Result<Response, AppError> {
    let result = state
        .run(move |s| s.auth.login(&s.db, &form.username, &form.password))
        .await?;
    match result {
        Ok(user) => {
            session.sign_in(user);
            session.redirect(&state.signer, "/home_feed")
        }
        Err(e) => recover(&state, session, e, "/login"),
    }
}

pub async fn register_form(
    State(state): State<SharedState>,
    mut session: Session,
) -> Result<Response, AppError> {
    let flashes = session.take_flashes();
    session.respond(&state.signer, pages::register(&flashes))
}

pub async fn register_submit(
    State(state): State<SharedState>,
    mut session: Session,
    Form(form): Form<Credentials>,
) -> Result<Response, AppError> {
    let result = state
        .run(move |s| s.auth.register(&s.db, &form.username, &form.password))
        .await?;
    match result {
        Ok(_) => {
            session.flash("Registration successful! Please log in.");
            session.redirect(&state.signer, "/login")
        }
        Err(e) => recover(&state, session, e, "/register"),
    }
}

pub async fn logout() -> impl IntoResponse {
    ([(SET_COOKIE, expired_cookie())], Redirect::to("/"))
}

pub async fn home_feed(
    State(state): State<SharedState>,
    LoggedIn { user, mut session }: LoggedIn,
    Query(query): Query<FeedQuery>,
) -> Result<Response, AppError> {
    let search = query.search.unwrap_or_default();
    let term = search.clone();
    let feed = state
        .run(move |s| events::list_events(&s.db, Some(term.as_str())))
        .await??;

    let flashes = session.take_flashes();
    session.respond(
        &state.signer,
        pages::home_feed(&user, &feed, &search, &flashes),
    )
}

pub async fn create_event_form(
    State(state): State<SharedState>,
    LoggedIn { user, mut session }: LoggedIn,
) -> Result<Response, AppError> {
    let flashes = session.take_flashes();
    session.respond(&state.signer, pages::create_event(&user, &flashes))
}

pub async fn create_event_submit(
    State(state): State<SharedState>,
    LoggedIn { user, mut session }: LoggedIn,
    Form(form): Form<EventForm>,
) -> Result<Response, AppError> {
    let new = NewEvent {
        title: form.title,
        description: form.description,
        date: form.date,
        location: form.location,
    };
    let result = state
        .run(move |s| events::create_event(&s.db, &user, new))
        .await?;
    match result {
        Ok(_) => {
            session.flash("Event created successfully!");
            session.redirect(&state.signer, "/home_feed")
        }
        Err(e) => recover(&state, session, e, "/create_event"),
    }
}

pub async fn rsvp_page(
    State(state): State<SharedState>,
    LoggedIn { user, mut session }: LoggedIn,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    let result = state
        .run(move |s| events::get_event(&s.db, event_id.parse::<EventId>()?))
        .await?;
    match result {
        Ok(event) => {
            let flashes = session.take_flashes();
            session.respond(&state.signer, pages::rsvp(&user, &event, &flashes))
        }
        Err(e) => recover(&state, session, e, "/home_feed"),
    }
}

pub async fn rsvp_submit(
    State(state): State<SharedState>,
    LoggedIn { user, mut session }: LoggedIn,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    let result = state
        .run(move |s| rsvps::rsvp(&s.db, &user, event_id.parse::<EventId>()?))
        .await?;
    match result {
        Ok((event, RsvpOutcome::Confirmed)) => {
            session.flash(format!("RSVP confirmed for {}.", event.title));
        }
        Ok((_, RsvpOutcome::AlreadyRsvped)) => {
            session.flash("You have already RSVP'd for this event.");
        }
        Err(e) => return recover(&state, session, e, "/home_feed"),
    }
    session.redirect(&state.signer, "/rsvped_events")
}

pub async fn rsvped_events(
    State(state): State<SharedState>,
    LoggedIn { user, mut session }: LoggedIn,
) -> Result<Response, AppError> {
    let owner = user.clone();
    let mine = state
        .run(move |s| rsvps::list_my_rsvps(&s.db, &owner))
        .await??;

    let flashes = session.take_flashes();
    session.respond(&state.signer, pages::rsvped_events(&user, &mine, &flashes))
}

/// Turns a domain error into a notice on the next page, or into an [`AppError`] when
/// there is nothing the user can do about it.
fn recover(
    state: &AppState,
    mut session: Session,
    e: occasio::Error,
    to: &str,
) -> Result<Response, AppError> {
    if !e.is_user_facing() {
        return Err(e.into());
    }
    session.flash(e.to_string());
    session.redirect(&state.signer, to)
}
