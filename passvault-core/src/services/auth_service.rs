//! 登录校验服务
//!
//! 用户表来自环境变量 `username1`/`password1`、`username2`/`password2` ……
//! 读取到第一个缺失或为空的编号为止。

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};

/// 用户名 → 密码 表
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: HashMap<String, String>,
}

impl UserDirectory {
    /// 从进程环境变量读取
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从任意变量来源读取（测试与配置注入）
    #[must_use]
    pub fn from_lookup<F>(mut lookup: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut users = HashMap::new();
        for n in 1.. {
            let username = lookup(&format!("username{n}")).filter(|v| !v.is_empty());
            let password = lookup(&format!("password{n}")).filter(|v| !v.is_empty());
            let (Some(username), Some(password)) = (username, password) else {
                break;
            };
            users.insert(username, password);
        }
        Self { users }
    }

    /// 由用户名/密码对构建
    #[must_use]
    pub fn from_pairs<I, U, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (U, P)>,
        U: Into<String>,
        P: Into<String>,
    {
        Self {
            users: pairs
                .into_iter()
                .map(|(u, p)| (u.into(), p.into()))
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn verify(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .is_some_and(|expected| expected == password)
    }
}

/// 登录校验服务
pub struct AuthService {
    directory: UserDirectory,
}

impl AuthService {
    /// 创建登录校验服务实例
    #[must_use]
    pub fn new(directory: UserDirectory) -> Self {
        if directory.is_empty() {
            log::warn!("No users configured, every login will be rejected");
        }
        Self { directory }
    }

    /// 校验用户名和密码，成功时返回用户名
    pub fn login(&self, username: &str, password: &str) -> CoreResult<String> {
        if self.directory.verify(username, password) {
            log::info!("User {username} logged in");
            Ok(username.to_string())
        } else {
            log::warn!("Rejected login for {username}");
            Err(CoreError::InvalidCredentials(username.to_string()))
        }
    }

    /// 已配置的用户数
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.directory.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> impl FnMut(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn reads_numbered_pairs_until_gap() {
        let directory = UserDirectory::from_lookup(env(&[
            ("username1", "alice"),
            ("password1", "a-pass"),
            ("username2", "bob"),
            ("password2", "b-pass"),
            ("username4", "carol"),
            ("password4", "c-pass"),
        ]));
        assert_eq!(directory.len(), 2);
    }

    #[test]
    fn empty_value_stops_reading() {
        let directory = UserDirectory::from_lookup(env(&[
            ("username1", "alice"),
            ("password1", ""),
            ("username2", "bob"),
            ("password2", "b-pass"),
        ]));
        assert!(directory.is_empty());
    }

    #[test]
    fn login_requires_exact_match() {
        let auth = AuthService::new(UserDirectory::from_pairs([("alice", "a-pass")]));

        assert_eq!(auth.login("alice", "a-pass").unwrap(), "alice");
        assert!(matches!(
            auth.login("alice", "A-pass"),
            Err(CoreError::InvalidCredentials(_))
        ));
        assert!(matches!(
            auth.login("Alice", "a-pass"),
            Err(CoreError::InvalidCredentials(_))
        ));
        assert!(matches!(
            auth.login("", ""),
            Err(CoreError::InvalidCredentials(_))
        ));
    }

    #[test]
    fn no_fallback_users() {
        let auth = AuthService::new(UserDirectory::default());
        assert_eq!(auth.user_count(), 0);
        assert!(auth.login("admin", "admin").is_err());
    }
}
