#[cfg(test)]
mod tests {
    use rocket::http::Status;

    use crate::models::{REPORT_CREATED, REPORT_UPDATED};
    use crate::storage::{announcements, reports};
    use crate::test::test_utils::{
        TARO, count, login_test_user, logout_test_user, setup_test_client, submit_report,
    };

    #[rocket::async_test]
    async fn test_next_plan_banner_after_relogin() {
        let app = setup_test_client().await;

        login_test_user(&app.client, TARO.0, TARO.1).await;
        assert!(app.page().await.contains("まだ日報がありません。"));

        let status = submit_report(&app.client, "2025-08-01", "Wrote tests", "", "Review PR").await;
        assert_eq!(status, Status::SeeOther);
        assert!(app.page().await.contains(REPORT_CREATED));

        logout_test_user(&app.client).await;
        login_test_user(&app.client, TARO.0, TARO.1).await;

        assert!(app.page().await.contains("予定: Review PR"));
    }

    #[rocket::async_test]
    async fn test_same_day_resubmission_replaces_report() {
        let app = setup_test_client().await;

        login_test_user(&app.client, TARO.0, TARO.1).await;
        submit_report(&app.client, "2025-08-01", "first version", "", "Review PR").await;
        submit_report(&app.client, "2025-08-01", "second version", "", "Review PR").await;

        let page = app.page().await;
        assert!(page.contains(REPORT_UPDATED));
        assert_eq!(count(&page, "class=\"report\""), 1);
        assert!(page.contains("second version"));
        assert!(!page.contains("first version"));

        let rows = reports::load(&app.store, "taro");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, "2025-08-01");
        assert_eq!(rows[0].work, "second version");
    }

    #[rocket::async_test]
    async fn test_blank_plan_shows_placeholder() {
        let app = setup_test_client().await;

        login_test_user(&app.client, TARO.0, TARO.1).await;
        submit_report(&app.client, "2025-08-01", "work", "", "Old plan").await;
        submit_report(&app.client, "2025-08-02", "work", "", "   ").await;

        let page = app.page().await;
        assert!(page.contains("直近の『次出勤日の予定』は未入力です。"));
        assert!(!page.contains("予定: Old plan"));
    }

    #[rocket::async_test]
    async fn test_history_is_newest_first() {
        let app = setup_test_client().await;

        login_test_user(&app.client, TARO.0, TARO.1).await;
        submit_report(&app.client, "2025-08-02", "middle day", "", "").await;
        submit_report(&app.client, "2025-08-03", "last day", "", "").await;
        submit_report(&app.client, "2025-08-01", "first day", "", "").await;

        let page = app.page().await;
        assert_eq!(count(&page, "class=\"report\""), 3);

        let last = page.find("last day").unwrap();
        let middle = page.find("middle day").unwrap();
        let first = page.find("first day").unwrap();
        assert!(last < middle && middle < first);
    }

    #[rocket::async_test]
    async fn test_resubmission_appends_announcement_again() {
        let app = setup_test_client().await;

        login_test_user(&app.client, TARO.0, TARO.1).await;
        submit_report(&app.client, "2025-08-01", "work", "Share this", "").await;
        submit_report(&app.client, "2025-08-01", "work", "Share this", "").await;

        assert_eq!(reports::load(&app.store, "taro").len(), 1);

        let log = announcements::load(&app.store);
        assert_eq!(log.len(), 2);
        assert!(log.iter().all(|a| a.date == "2025-08-01" && !a.done));
    }

    #[rocket::async_test]
    async fn test_fields_are_trimmed() {
        let app = setup_test_client().await;

        login_test_user(&app.client, TARO.0, TARO.1).await;
        submit_report(&app.client, " 2025/08/01 ", "  padded work  ", " note ", "  plan  ").await;

        let rows = reports::load(&app.store, "taro");
        assert_eq!(rows[0].date, "2025-08-01");
        assert_eq!(rows[0].work, "padded work");
        assert_eq!(rows[0].next_plan, "plan");
        assert_eq!(announcements::load(&app.store)[0].announcement, "note");
    }
}
