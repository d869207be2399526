use rocket::State;
use rocket::form::Form;
use rocket::http::CookieJar;
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket_dyn_templates::{Template, context};
use tracing::{info, instrument, warn};

use crate::auth::{Identity, end_session, start_session};
use crate::error::AppError;
use crate::models::{
    ANNOUNCEMENT_FAILED, BOARD_FAILED, BOARD_UNCHANGED, BOARD_UPDATED, BannerView, FlashView,
    LOGIN_FAILED, REPORT_CREATED, REPORT_FAILED, REPORT_UPDATED, login_succeeded,
};
use crate::storage::reports::{DailyReport, SaveOutcome};
use crate::storage::{Store, announcements, credentials, dates, reports};

/// The whole application is this one page, rebuilt from disk on every visit.
#[get("/?<user_id>")]
pub async fn index(
    user_id: Option<String>,
    identity: Option<Identity>,
    flash: Option<FlashMessage<'_>>,
    store: &State<Store>,
) -> Template {
    let board = announcements::board(store);
    let flash = flash.map(FlashView::from);

    match identity {
        Some(identity) => {
            let history = reports::history(store, &identity.user_id);
            let banner = BannerView::from(reports::latest_next_plan(store, &identity.user_id));
            let today = dates::today();

            Template::render(
                "index",
                context! {
                    title: "業務日報",
                    board,
                    flash,
                    identity,
                    banner,
                    history,
                    today,
                },
            )
        }
        None => Template::render(
            "index",
            context! {
                title: "業務日報",
                board,
                flash,
                identity: Option::<Identity>::None,
                login_user_id: user_id.unwrap_or_default(),
            },
        ),
    }
}

#[derive(FromForm)]
pub struct LoginForm {
    user_id: String,
    password: String,
}

#[post("/login", data = "<form>")]
#[instrument(skip_all, fields(user_id = %form.user_id.trim()))]
pub async fn login(
    form: Form<LoginForm>,
    cookies: &CookieJar<'_>,
    store: &State<Store>,
) -> Flash<Redirect> {
    let user_id = form.user_id.trim();

    match credentials::authenticate(store, user_id, &form.password) {
        Some(identity) => {
            info!("Login succeeded");
            start_session(cookies, &identity);
            Flash::success(Redirect::to(uri!(index(_))), login_succeeded(&identity.display_name))
        }
        None => {
            warn!("Login failed");
            Flash::error(Redirect::to(uri!(index(Some(user_id)))), LOGIN_FAILED)
        }
    }
}

#[post("/logout")]
pub async fn logout(cookies: &CookieJar<'_>) -> Redirect {
    end_session(cookies);
    Redirect::to(uri!(index(_)))
}

#[derive(FromForm)]
pub struct ReportForm {
    date: String,
    work: String,
    announcement: String,
    notes: String,
    next_plan: String,
}

#[post("/reports", data = "<form>")]
#[instrument(skip_all, fields(user_id = %identity.user_id))]
pub async fn submit_report(
    identity: Identity,
    form: Form<ReportForm>,
    store: &State<Store>,
) -> Flash<Redirect> {
    let form = form.into_inner();
    let date = match form.date.trim() {
        "" => dates::today(),
        date => date.to_string(),
    };

    let report = DailyReport {
        date: date.clone(),
        work: form.work.trim().to_string(),
        announcement: form.announcement.trim().to_string(),
        notes: form.notes.trim().to_string(),
        next_plan: form.next_plan.trim().to_string(),
    };
    let announcement = report.announcement.clone();

    let outcome = match reports::save(store, &identity.user_id, report) {
        Ok(outcome) => outcome,
        Err(err) => {
            err.log_and_record("Saving report");
            return Flash::error(Redirect::to(uri!(index(_))), REPORT_FAILED);
        }
    };

    if let Err(err) = announcements::append(
        store,
        &identity.user_id,
        &identity.display_name,
        &date,
        &announcement,
    ) {
        err.log_and_record("Appending announcement");
        return Flash::warning(Redirect::to(uri!(index(_))), ANNOUNCEMENT_FAILED);
    }

    let message = match outcome {
        SaveOutcome::Updated => REPORT_UPDATED,
        SaveOutcome::Created => REPORT_CREATED,
    };
    Flash::success(Redirect::to(uri!(index(_))), message)
}

#[post("/reports", rank = 2)]
pub async fn submit_report_unauthorized() -> Redirect {
    warn!("Report submitted without a session");
    Redirect::to(uri!(index(_)))
}

/// `shown` lists every row rendered on the board, `done` the rows left checked.
#[derive(FromForm)]
pub struct BoardForm {
    shown: Vec<usize>,
    done: Vec<usize>,
}

#[post("/announcements", data = "<form>")]
#[instrument(skip_all)]
pub async fn update_board(form: Form<BoardForm>, store: &State<Store>) -> Flash<Redirect> {
    let changes: Vec<(usize, bool)> = form
        .shown
        .iter()
        .map(|row| (*row, form.done.contains(row)))
        .collect();

    match announcements::set_done_flags(store, &changes) {
        Ok(0) => Flash::new(Redirect::to(uri!(index(_))), "info", BOARD_UNCHANGED),
        Ok(_) => Flash::success(Redirect::to(uri!(index(_))), BOARD_UPDATED),
        Err(err) => {
            err.log_and_record("Updating announcement board");
            Flash::error(Redirect::to(uri!(index(_))), BOARD_FAILED)
        }
    }
}

/// Fails when the data directory has gone away underneath the app.
#[get("/health")]
pub fn health(store: &State<Store>) -> Result<&'static str, AppError> {
    let metadata = std::fs::metadata(store.data_dir())?;
    if !metadata.is_dir() {
        return Err(AppError::NotFound(format!(
            "{} is not a directory",
            store.data_dir().display()
        )));
    }

    Ok("OK")
}
