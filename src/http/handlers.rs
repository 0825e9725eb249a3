//! Route handlers: decode the body, call the use case, encode the result

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use super::routes::Route;
use super::types::{
    AdRewardRequest, AnswerRequest, LoginRequest, MiniGameRequest, PurchaseRequest,
    QuizValidateRequest, RefreshRequest, RegisterRequest,
};
use super::HttpState;
use crate::error::{BowoError, BowoResult};
use crate::service::list_levels;

/// Status and JSON body of a successful call
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    fn ok(value: impl Serialize) -> BowoResult<Self> {
        Ok(Self {
            status: 200,
            body: serde_json::to_value(value)?,
        })
    }

    fn created(value: impl Serialize) -> BowoResult<Self> {
        Ok(Self {
            status: 201,
            body: serde_json::to_value(value)?,
        })
    }
}

/// Dispatch one request. `user_id` is set for every non-public route.
pub fn handle(
    state: &HttpState,
    route: Route,
    user_id: Option<&str>,
    body: &str,
) -> BowoResult<Reply> {
    let user = || user_id.ok_or(BowoError::Unauthorized);
    let progress = &state.progress;

    match route {
        Route::Health => Reply::ok(json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
        })),

        Route::Register => {
            let req: RegisterRequest = parse_body(body)?;
            Reply::created(state.auth.register(&req.username, &req.email, &req.password)?)
        }
        Route::Login => {
            let req: LoginRequest = parse_body(body)?;
            Reply::ok(state.auth.login(&req.username, &req.password)?)
        }
        Route::Refresh => {
            let req: RefreshRequest = parse_body(body)?;
            Reply::ok(state.auth.refresh(&req.refresh_token)?)
        }
        Route::Me => Reply::ok(state.auth.me(user()?)?),
        Route::DeleteAccount => {
            state.auth.delete_account(user()?)?;
            Reply::ok(json!({ "deleted": true }))
        }

        Route::Levels => Reply::ok(list_levels()),
        Route::Badges => Reply::ok(progress.list_badges(user()?)?),
        Route::Tricks => Reply::ok(progress.list_tricks(user()?)?),
        Route::UnlockTrick(trick_id) => Reply::ok(progress.unlock_trick(user()?, &trick_id)?),

        Route::Progress => Reply::ok(progress.get_progress(user()?)?),
        Route::Daily => Reply::ok(progress.update_daily(user()?)?),
        Route::UnlockMiniGame => {
            let req: MiniGameRequest = parse_body(body)?;
            Reply::ok(progress.unlock_mini_game(user()?, &req.key)?)
        }
        Route::AliveDecks => Reply::ok(progress.list_alive_decks(user()?)?),
        Route::UnlockAliveDeck(deck_id) => {
            Reply::ok(progress.unlock_alive_deck(user()?, &deck_id)?)
        }
        Route::Bubbles => Reply::ok(progress.list_bubbles(user()?)?),
        Route::ChooseBubble(bubble_id) => Reply::ok(progress.choose_bubble(user()?, &bubble_id)?),
        Route::ShopShapes => Reply::ok(progress.list_shop_shapes(user()?)?),
        Route::BuyShopShape(shape_id) => Reply::ok(progress.buy_shop_shape(user()?, &shape_id)?),
        Route::NextQuestion(trick_id) => Reply::ok(progress.next_question(user()?, &trick_id)?),
        Route::SubmitAnswer(trick_id) => {
            let req: AnswerRequest = parse_body(body)?;
            Reply::ok(progress.submit_answer(user()?, &trick_id, req.level, &req.user_answer)?)
        }

        Route::Quiz(trick_id) => Reply::ok(progress.get_quiz(user()?, &trick_id)?),
        Route::ValidateQuiz => {
            let req: QuizValidateRequest = parse_body(body)?;
            Reply::ok(progress.validate_quiz(user()?, &req.trick_id, req.answer_index)?)
        }
        Route::AdReward => {
            let req: AdRewardRequest = parse_body(body)?;
            Reply::ok(progress.ad_reward(user()?, &req.trick_id, &req.ad_token)?)
        }
        Route::ValidatePurchase => {
            let req: PurchaseRequest = parse_body(body)?;
            Reply::ok(progress.validate_purchase(user()?, &req.trick_id, &req.purchase_token)?)
        }
    }
}

/// Malformed bodies are the client's fault, not a 500
fn parse_body<T: DeserializeOwned>(body: &str) -> BowoResult<T> {
    serde_json::from_str(body)
        .map_err(|e| BowoError::InvalidInput(format!("bad request body: {e}")))
}

/// `{"error": code, "details": message}`; internal details stay in the log
pub fn error_body(err: &BowoError) -> Value {
    let details = if err.is_internal() {
        "internal server error".to_string()
    } else {
        err.to_string()
    };
    json!({ "error": err.code(), "details": details })
}
