//! Routing table

/// Every endpoint the server answers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Health,

    // Accounts
    Register,
    Login,
    Refresh,
    Me,
    DeleteAccount,

    // Catalogs
    Levels,
    Badges,
    Tricks,
    UnlockTrick(String),

    // Progress
    Progress,
    Daily,
    UnlockMiniGame,
    AliveDecks,
    UnlockAliveDeck(String),
    Bubbles,
    ChooseBubble(String),
    ShopShapes,
    BuyShopShape(String),
    NextQuestion(String),
    SubmitAnswer(String),

    // Quizzes and unlock stubs
    Quiz(String),
    ValidateQuiz,
    AdReward,
    ValidatePurchase,
}

impl Route {
    /// Match a request. The query string must already be stripped.
    pub fn parse(method: &str, path: &str) -> Option<Self> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let route = match (method, segments.as_slice()) {
            ("GET", ["health"]) => Self::Health,

            ("POST", ["account", "register"]) => Self::Register,
            ("POST", ["account", "login"]) => Self::Login,
            ("POST", ["account", "refresh"]) => Self::Refresh,
            ("GET", ["account", "me"]) => Self::Me,
            ("DELETE", ["account"]) => Self::DeleteAccount,

            ("GET", ["levels"]) => Self::Levels,
            ("GET", ["badges"]) => Self::Badges,
            ("GET", ["tricks"]) => Self::Tricks,
            ("POST", ["tricks", id, "unlock"]) => Self::UnlockTrick(id.to_string()),

            ("GET", ["progress"]) => Self::Progress,
            ("POST", ["progress", "daily"]) => Self::Daily,
            ("POST", ["progress", "unlock-mini-game"]) => Self::UnlockMiniGame,
            ("GET", ["progress", "alive-decks"]) => Self::AliveDecks,
            ("POST", ["progress", "alive-decks", id, "unlock"]) => {
                Self::UnlockAliveDeck(id.to_string())
            }
            ("GET", ["progress", "avatar", "bubbles"]) => Self::Bubbles,
            ("POST", ["progress", "avatar", "bubbles", id]) => Self::ChooseBubble(id.to_string()),
            ("GET", ["progress", "avatar", "shop", "shapes"]) => Self::ShopShapes,
            ("POST", ["progress", "avatar", "shop", "shapes", id, "unlock"]) => {
                Self::BuyShopShape(id.to_string())
            }
            ("GET", ["progress", trick, "next"]) => Self::NextQuestion(trick.to_string()),
            ("POST", ["progress", trick, "answer"]) => Self::SubmitAnswer(trick.to_string()),

            ("POST", ["quiz", "validate"]) => Self::ValidateQuiz,
            ("POST", ["quiz", "ad", "reward"]) => Self::AdReward,
            ("POST", ["quiz", "purchase", "validate"]) => Self::ValidatePurchase,
            ("GET", ["quiz", trick]) => Self::Quiz(trick.to_string()),

            _ => return None,
        };
        Some(route)
    }

    /// Routes served without a bearer token
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Self::Health | Self::Register | Self::Login | Self::Refresh | Self::Levels
        )
    }
}
