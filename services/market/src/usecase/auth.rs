use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use campus_domain::id::{SessionToken, UserId};
use campus_domain::user::Role;

use crate::config::DEFAULT_SESSION_IDLE_TTL;
use crate::domain::repository::UserRepository;
use crate::domain::types::{NewUser, Session, User};
use crate::domain::validate::validate_registration;
use crate::error::MarketError;

pub struct RegisterInput {
    pub username: String,
    pub password: String,
    pub email: String,
    pub campus: String,
}

struct SessionEntry {
    user_id: UserId,
    last_seen: Instant,
}

/// Registration, login and the session registry.
///
/// Sessions live only in memory: a restart logs everybody out. A session
/// left unused for the idle TTL expires; expired entries are pruned on login.
pub struct AuthService<U: UserRepository> {
    users: U,
    sessions: Mutex<HashMap<SessionToken, SessionEntry>>,
    idle_ttl: Duration,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(users: U) -> Self {
        Self::with_idle_ttl(users, DEFAULT_SESSION_IDLE_TTL)
    }

    pub fn with_idle_ttl(users: U, idle_ttl: Duration) -> Self {
        Self {
            users,
            sessions: Mutex::new(HashMap::new()),
            idle_ttl,
        }
    }

    pub fn users(&self) -> &U {
        &self.users
    }

    fn sessions(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<SessionToken, SessionEntry>>, MarketError> {
        self.sessions
            .lock()
            .map_err(|_| MarketError::poisoned("session registry"))
    }

    // ── Register ─────────────────────────────────────────────────────────────

    /// Create a student account. Does not log the new user in.
    pub fn register(&self, input: RegisterInput) -> Result<User, MarketError> {
        validate_registration(&input.username, &input.password, &input.email, &input.campus)?;
        self.users.create(NewUser {
            username: input.username,
            password: input.password,
            email: input.email,
            campus: input.campus,
            role: Role::Student,
        })
    }

    // ── Login / logout ───────────────────────────────────────────────────────

    pub fn login(&self, username: &str, password: &str) -> Result<Session, MarketError> {
        let Some(user) = self.users.find_by_credentials(username, password)? else {
            debug!(username, "login rejected");
            return Err(MarketError::InvalidCredentials);
        };

        let token = SessionToken::generate();
        let mut sessions = self.sessions()?;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen.elapsed() < self.idle_ttl);
        if sessions.len() < before {
            debug!(expired = before - sessions.len(), "pruned idle sessions");
        }
        sessions.insert(
            token,
            SessionEntry {
                user_id: user.id.clone(),
                last_seen: Instant::now(),
            },
        );
        info!(user_id = %user.id, "session opened");
        Ok(Session { token, user })
    }

    /// Forget `token`. Unknown tokens are ignored.
    pub fn logout(&self, token: &SessionToken) -> Result<(), MarketError> {
        if let Some(entry) = self.sessions()?.remove(token) {
            info!(user_id = %entry.user_id, "session closed");
        }
        Ok(())
    }

    // ── Session lookup ───────────────────────────────────────────────────────

    /// The user behind `token`, if the session exists, has not gone idle, and
    /// the account is still present and active. Dead sessions are dropped on
    /// the way; live ones are refreshed.
    pub fn current_user(&self, token: &SessionToken) -> Result<Option<User>, MarketError> {
        let mut sessions = self.sessions()?;
        let Some(entry) = sessions.get_mut(token) else {
            return Ok(None);
        };
        let user_id = entry.user_id.clone();
        if entry.last_seen.elapsed() >= self.idle_ttl {
            sessions.remove(token);
            debug!(user_id = %user_id, "session expired");
            return Ok(None);
        }
        entry.last_seen = Instant::now();
        match self.users.find_by_id(&user_id)? {
            Some(user) if user.status.is_active() => Ok(Some(user)),
            _ => {
                sessions.remove(token);
                debug!(user_id = %user_id, "dropped session of missing or suspended user");
                Ok(None)
            }
        }
    }

    pub fn is_logged_in(&self, token: &SessionToken) -> bool {
        matches!(self.current_user(token), Ok(Some(_)))
    }

    pub fn require_user(&self, token: &SessionToken) -> Result<User, MarketError> {
        self.current_user(token)?.ok_or(MarketError::Unauthorized)
    }

    pub fn require_admin(&self, token: &SessionToken) -> Result<User, MarketError> {
        let user = self.require_user(token)?;
        if !user.role.can_moderate() {
            return Err(MarketError::Forbidden);
        }
        Ok(user)
    }

    pub fn session_count(&self) -> Result<usize, MarketError> {
        Ok(self.sessions()?.len())
    }
}
