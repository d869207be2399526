use rocket::request::FlashMessage;
use serde::Serialize;

use crate::storage::reports::Banner;

pub const LOGIN_FAILED: &str = "ユーザーID または パスワードが正しくありません。";
pub const REPORT_CREATED: &str = "保存しました。";
pub const REPORT_UPDATED: &str = "当日分の記録を上書き保存しました。";
pub const REPORT_FAILED: &str = "日報の保存に失敗しました。";
pub const ANNOUNCEMENT_FAILED: &str = "日報は保存しましたが、全体申し送りの追加に失敗しました。";
pub const BOARD_UPDATED: &str = "全体申し送りの『不要』状態を更新しました。";
pub const BOARD_UNCHANGED: &str = "変更はありません。";
pub const BOARD_FAILED: &str = "全体申し送りの更新に失敗しました。";

#[derive(Debug, Serialize)]
pub struct FlashView {
    pub kind: String,
    pub message: String,
}

impl From<FlashMessage<'_>> for FlashView {
    fn from(flash: FlashMessage<'_>) -> Self {
        Self {
            kind: flash.kind().to_string(),
            message: flash.message().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BannerView {
    pub has_plan: bool,
    pub message: String,
}

impl From<Banner> for BannerView {
    fn from(banner: Banner) -> Self {
        match banner {
            Banner::Plan(plan) => Self {
                has_plan: true,
                message: format!("予定: {}", plan),
            },
            Banner::Blank => Self {
                has_plan: false,
                message: "直近の『次出勤日の予定』は未入力です。".to_string(),
            },
            Banner::NoReports => Self {
                has_plan: false,
                message: "まだ日報がありません。『日報の登録』から入力してください。".to_string(),
            },
        }
    }
}

pub fn login_succeeded(display_name: &str) -> String {
    format!("{} としてログインしました。", display_name)
}
