#[cfg(test)]
pub mod test_utils {
    use std::fs;
    use std::path::PathBuf;

    use rocket::http::{ContentType, Status};
    use rocket::local::asynchronous::Client;
    use tempfile::TempDir;

    use crate::init_rocket;
    use crate::storage::Store;

    pub const TARO: (&str, &str) = ("taro", "pass123");
    pub const HANAKO: (&str, &str) = ("hanako", "pass456");

    /// A running app on its own data directory. Keep it alive for the whole test.
    pub struct TestApp {
        pub client: Client,
        pub store: Store,
        _data_dir: TempDir,
    }

    impl TestApp {
        pub fn data_path(&self, relative: &str) -> PathBuf {
            self.store.data_dir().join(relative)
        }

        pub fn read(&self, relative: &str) -> String {
            fs::read_to_string(self.data_path(relative)).unwrap_or_default()
        }

        pub async fn page(&self) -> String {
            let response = self.client.get("/").dispatch().await;
            assert_eq!(response.status(), Status::Ok);
            response.into_string().await.unwrap_or_default()
        }
    }

    pub async fn setup_test_client() -> TestApp {
        crate::telemetry::init_tracing();

        let data_dir = TempDir::new().expect("Failed to create data directory");
        let figment = rocket::Config::figment()
            .merge(("data_dir", data_dir.path()))
            .merge((
                "template_dir",
                concat!(env!("CARGO_MANIFEST_DIR"), "/templates"),
            ))
            .merge(("log_level", "off"));

        let client = Client::tracked(init_rocket(figment))
            .await
            .expect("Failed to build test client");

        TestApp {
            client,
            store: Store::new(data_dir.path()),
            _data_dir: data_dir,
        }
    }

    pub async fn login_test_user(client: &Client, user_id: &str, password: &str) -> Status {
        let response = client
            .post("/login")
            .header(ContentType::Form)
            .body(format!("user_id={}&password={}", user_id, password))
            .dispatch()
            .await;

        response.status()
    }

    pub async fn logout_test_user(client: &Client) {
        let response = client.post("/logout").dispatch().await;
        assert_eq!(response.status(), Status::SeeOther);
    }

    pub async fn submit_report(
        client: &Client,
        date: &str,
        work: &str,
        announcement: &str,
        next_plan: &str,
    ) -> Status {
        let body = form_body(&[
            ("date", date),
            ("work", work),
            ("announcement", announcement),
            ("notes", ""),
            ("next_plan", next_plan),
        ]);

        client
            .post("/reports")
            .header(ContentType::Form)
            .body(body)
            .dispatch()
            .await
            .status()
    }

    pub fn form_body(fields: &[(&str, &str)]) -> String {
        fields
            .iter()
            .map(|(key, value)| format!("{}={}", key, value.replace(' ', "+")))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    /// Board rows as a browser sees them: every `shown` row and the rows whose box is checked.
    pub fn rendered_board(page: &str) -> (Vec<usize>, Vec<usize>) {
        let shown = input_values(page, "<input type=\"hidden\" name=\"shown\" value=\"")
            .map(|(row, _)| row)
            .collect();
        let checked = input_values(page, "<input type=\"checkbox\" name=\"done\" value=\"")
            .filter(|(_, rest)| rest.starts_with(" checked"))
            .map(|(row, _)| row)
            .collect();

        (shown, checked)
    }

    /// The form body a browser submits for the board with `checked` boxes ticked.
    pub fn board_body(shown: &[usize], checked: &[usize]) -> String {
        shown
            .iter()
            .map(|row| format!("shown={}", row))
            .chain(checked.iter().map(|row| format!("done={}", row)))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn input_values<'a>(
        page: &'a str,
        prefix: &'a str,
    ) -> impl Iterator<Item = (usize, &'a str)> + 'a {
        page.split(prefix).skip(1).map(|tail| {
            let (value, rest) = tail.split_once('"').unwrap();
            (value.parse().unwrap(), rest)
        })
    }
}
