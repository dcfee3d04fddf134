//! Business error codes embedded in HTTP-200 bodies.
//!
//! WeRead reports failures as `{"errcode": -2012, "errmsg": "..."}`; some
//! endpoints spell the fields `errCode`/`errMsg`, and list endpoints may
//! return an array whose first element carries the code.

use serde_json::Value;

/// Codes meaning the cookie no longer identifies a valid session.
pub const SESSION_EXPIRED_CODES: [i64; 2] = [-2012, -2010];

/// Result of inspecting a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiStatus {
    /// Code absent, null or zero.
    Success,
    SessionExpired { code: i64, message: String },
    Business { code: i64, message: String },
}

impl ApiStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Code reported for an `errcode` that is present but not an integer,
/// such as `"oops"` or `true`.
pub const UNRECOGNIZED_CODE: i64 = -1;

/// Classify a parsed response body.
///
/// Any present, non-null code that is not numerically zero is an error.
/// Falsy JSON values (`false`, `""`) count as zero.
pub fn classify(body: &Value) -> ApiStatus {
    let target = match body {
        Value::Array(items) => match items.first() {
            Some(first) => first,
            None => return ApiStatus::Success,
        },
        other => other,
    };

    let Some(raw) = field(target, "errcode", "errCode") else {
        return ApiStatus::Success;
    };

    let message = field(target, "errmsg", "errMsg")
        .and_then(Value::as_str)
        .unwrap_or("unknown error");

    match read_code(raw) {
        Code::Zero => ApiStatus::Success,
        Code::Numeric(code) if SESSION_EXPIRED_CODES.contains(&code) => ApiStatus::SessionExpired {
            code,
            message: message.to_owned(),
        },
        Code::Numeric(code) => ApiStatus::Business {
            code,
            message: message.to_owned(),
        },
        Code::Unrecognized(text) => ApiStatus::Business {
            code: UNRECOGNIZED_CODE,
            message: format!("{message} (errcode {text})"),
        },
    }
}

enum Code {
    Zero,
    Numeric(i64),
    Unrecognized(String),
}

fn field<'a>(v: &'a Value, lower: &str, camel: &str) -> Option<&'a Value> {
    v.get(lower).or_else(|| v.get(camel)).filter(|f| !f.is_null())
}

fn read_code(v: &Value) -> Code {
    match v {
        Value::Number(n) => match n.as_i64() {
            Some(code) => integral(code),
            None => {
                let text = n.to_string();
                match n.as_f64() {
                    Some(f) => float_code(f, &text),
                    None => Code::Unrecognized(text),
                }
            }
        },
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Code::Zero
            } else if let Ok(code) = trimmed.parse::<i64>() {
                integral(code)
            } else if let Ok(f) = trimmed.parse::<f64>() {
                float_code(f, trimmed)
            } else {
                Code::Unrecognized(format!("{s:?}"))
            }
        }
        Value::Bool(false) => Code::Zero,
        other => Code::Unrecognized(other.to_string()),
    }
}

fn integral(code: i64) -> Code {
    if code == 0 { Code::Zero } else { Code::Numeric(code) }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::float_cmp)]
fn float_code(f: f64, text: &str) -> Code {
    if f == 0.0 {
        Code::Zero
    } else if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Code::Numeric(f as i64)
    } else {
        Code::Unrecognized(text.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn session_expired_in_every_shape() {
        for body in [
            json!({ "errcode": -2012 }),
            json!({ "errCode": -2012 }),
            json!([{ "errCode": -2012 }]),
        ] {
            assert_eq!(
                classify(&body),
                ApiStatus::SessionExpired {
                    code: -2012,
                    message: "unknown error".into()
                },
                "body: {body}"
            );
        }
    }

    #[test]
    fn zero_and_absent_are_success() {
        assert!(classify(&json!({ "errcode": 0 })).is_success());
        assert!(classify(&json!({})).is_success());
        assert!(classify(&json!([])).is_success());
        assert!(classify(&json!({ "books": [] })).is_success());
        assert!(classify(&json!({ "errcode": null })).is_success());
    }

    #[test]
    fn user_missing_is_session_expired() {
        assert_eq!(
            classify(&json!({ "errcode": -2010, "errmsg": "用户不存在" })),
            ApiStatus::SessionExpired {
                code: -2010,
                message: "用户不存在".into()
            }
        );
    }

    #[test]
    fn business_error_keeps_message() {
        assert_eq!(
            classify(&json!({ "errCode": -1, "errMsg": "rate limited" })),
            ApiStatus::Business {
                code: -1,
                message: "rate limited".into()
            }
        );
    }

    #[test]
    fn only_first_array_element_is_inspected() {
        assert!(classify(&json!([{ "bookId": "1" }, { "errcode": -2012 }])).is_success());
    }

    #[test]
    fn string_codes_are_parsed() {
        assert_eq!(
            classify(&json!({ "errcode": "-2012" })),
            ApiStatus::SessionExpired {
                code: -2012,
                message: "unknown error".into()
            }
        );
    }

    #[test]
    fn float_codes_are_classified() {
        assert_eq!(
            classify(&json!({ "errcode": -2012.0 })),
            ApiStatus::SessionExpired {
                code: -2012,
                message: "unknown error".into()
            }
        );
        assert!(classify(&json!({ "errcode": 0.0 })).is_success());
        assert_eq!(
            classify(&json!({ "errcode": -1.5, "errmsg": "odd" })),
            ApiStatus::Business {
                code: UNRECOGNIZED_CODE,
                message: "odd (errcode -1.5)".into()
            }
        );
    }

    #[test]
    fn non_numeric_codes_are_business_errors() {
        assert_eq!(
            classify(&json!({ "errcode": "oops", "errmsg": "bad" })),
            ApiStatus::Business {
                code: UNRECOGNIZED_CODE,
                message: "bad (errcode \"oops\")".into()
            }
        );
        assert_eq!(
            classify(&json!({ "errCode": true })),
            ApiStatus::Business {
                code: UNRECOGNIZED_CODE,
                message: "unknown error (errcode true)".into()
            }
        );
        assert!(classify(&json!({ "errcode": false })).is_success());
        assert!(classify(&json!({ "errcode": "" })).is_success());
        assert!(classify(&json!({ "errcode": "0" })).is_success());
    }
}
