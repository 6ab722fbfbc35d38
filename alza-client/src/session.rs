//! Per-run session state.

/// Where basket resolution stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Basket {
    /// Not looked up yet, or invalidated by a cart mutation.
    #[default]
    Unresolved,
    /// Looked up; the account has no active basket.
    Empty,
    /// Looked up; the active basket ID.
    Active(String),
}

/// Identity and basket state for one process run.
///
/// Only the token is ever persisted. Identity and basket are resolved
/// lazily and cached here.
#[derive(Clone, Default)]
pub struct Session {
    auth_token: String,
    user_id: String,
    basket: Basket,
}

impl Session {
    /// Creates an unresolved session for a token.
    ///
    /// The token is stored as given, including its `Bearer ` prefix.
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into().trim().to_string(),
            ..Self::default()
        }
    }

    /// The `Authorization` header value.
    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    /// The resolved user ID, empty until identity resolution ran.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The basket resolution state.
    pub fn basket(&self) -> &Basket {
        &self.basket
    }

    /// The active basket ID, or `""` when there is none or it is unresolved.
    pub fn basket_id(&self) -> &str {
        match &self.basket {
            Basket::Active(id) => id,
            Basket::Unresolved | Basket::Empty => "",
        }
    }

    pub(crate) fn set_user_id(&mut self, user_id: impl Into<String>) {
        self.user_id = user_id.into();
    }

    pub(crate) fn set_basket(&mut self, basket: Basket) {
        self.basket = basket;
    }

    /// Forgets the basket so the next cart call looks it up again.
    pub(crate) fn invalidate_basket(&mut self) {
        self.basket = Basket::Unresolved;
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("auth_token", &format_args!("<{} bytes>", self.auth_token.len()))
            .field("user_id", &self.user_id)
            .field("basket", &self.basket)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basket_id_empty_unless_active() {
        let mut session = Session::new(" Bearer abc \n");
        assert_eq!(session.auth_token(), "Bearer abc");
        assert_eq!(session.basket_id(), "");

        session.set_basket(Basket::Empty);
        assert_eq!(session.basket_id(), "");

        session.set_basket(Basket::Active("77".into()));
        assert_eq!(session.basket_id(), "77");

        session.invalidate_basket();
        assert_eq!(session.basket(), &Basket::Unresolved);
    }

    #[test]
    fn test_debug_hides_token() {
        let session = Session::new("Bearer secret");
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<13 bytes>"));
    }
}
