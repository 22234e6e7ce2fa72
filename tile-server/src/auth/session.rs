//! 模拟登录会话
//!
//! 不校验密码：提交姓名和可选的联系方式即可拿到 bearer 令牌。
//! 顾客 ID 由邮箱 (或电话) 推导，同一顾客再次登录能看到原来的订单。

use crate::utils::AppError;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PHONE_LEN, validate_optional_text, validate_required_text,
};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// 已登录顾客，注入到请求扩展中
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentCustomer {
    pub token: String,
    pub customer_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, CurrentCustomer>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&self, req: LoginRequest) -> Result<CurrentCustomer, AppError> {
        validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
        let email = non_blank(req.email);
        let phone = non_blank(req.phone);
        validate_optional_text(&email, "email", MAX_EMAIL_LEN)?;
        validate_optional_text(&phone, "phone", MAX_PHONE_LEN)?;

        let customer = CurrentCustomer {
            token: uuid::Uuid::new_v4().to_string(),
            customer_id: customer_id_for(email.as_deref(), phone.as_deref()),
            name: req.name.trim().to_string(),
            email,
            phone,
        };
        self.sessions.insert(customer.token.clone(), customer.clone());
        Ok(customer)
    }

    pub fn resolve(&self, token: &str) -> Option<CurrentCustomer> {
        self.sessions.get(token).map(|c| c.value().clone())
    }

    pub fn logout(&self, token: &str) -> Option<CurrentCustomer> {
        self.sessions.remove(token).map(|(_, c)| c)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// 从 `Authorization: Bearer <token>` 头中提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header
            .strip_prefix(BEARER_PREFIX)
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 由联系方式生成稳定 ID；匿名登录每次生成新 ID
fn customer_id_for(email: Option<&str>, phone: Option<&str>) -> String {
    if let Some(email) = email {
        return format!("email:{}", email.to_lowercase());
    }
    if let Some(phone) = phone {
        let digits: String = phone.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect();
        if !digits.is_empty() {
            return format!("phone:{digits}");
        }
    }
    format!("guest:{}", uuid::Uuid::new_v4())
}
