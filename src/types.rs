//! Shared domain enums used by the store, the services and the wire format.
//!
//! Every enum round-trips through its snake_case string form, which is what
//! the database columns and the JSON payloads carry.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} value: '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $kind:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(ParseEnumError { kind: $kind, value: other.to_string() }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = ParseEnumError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

string_enum! {
    /// Account role. `superadmin` carries every admin capability.
    UserRole as "role" {
        Admin => "admin",
        User => "user",
        SuperAdmin => "superadmin",
    }
}

impl UserRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::SuperAdmin)
    }
}

string_enum! {
    /// Industry vertical a user belongs to; drives bot defaults and lead access.
    UserCategory as "category" {
        RealEstate => "real_estate",
        Hospitality => "hospitality",
        Sales => "sales",
        Healthcare => "healthcare",
        Automotive => "automotive",
    }
}

impl UserCategory {
    /// "real_estate" -> "Real Estate"
    pub fn title(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

string_enum! {
    UserStatus as "status" {
        Active => "active",
        Paused => "paused",
        Blocked => "blocked",
    }
}

string_enum! {
    PaymentStatus as "payment status" {
        Pending => "pending",
        Paid => "paid",
        Overdue => "overdue",
        Cancelled => "cancelled",
    }
}

string_enum! {
    TransactionType as "transaction type" {
        Topup => "topup",
        MonthlyBill => "monthly_bill",
        UsageCharge => "usage_charge",
    }
}

string_enum! {
    CallOutcome as "call outcome" {
        Interested => "interested",
        NotInterested => "not_interested",
        Callback => "callback",
        Voicemail => "voicemail",
        NoAnswer => "no_answer",
    }
}

string_enum! {
    BotModel as "bot model" {
        Gpt4 => "gpt-4",
        Gpt35Turbo => "gpt-3.5-turbo",
        Claude3 => "claude-3",
    }
}

string_enum! {
    NotificationKind as "notification kind" {
        ContactForm => "contact_form",
        AdminUpdate => "admin_update",
        System => "system",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names() {
        assert_eq!("real_estate".parse::<UserCategory>().unwrap(), UserCategory::RealEstate);
        assert_eq!("gpt-3.5-turbo".parse::<BotModel>().unwrap(), BotModel::Gpt35Turbo);
        assert_eq!(UserStatus::Blocked.as_str(), "blocked");
    }

    #[test]
    fn rejects_unknown_values() {
        let err = "plumbing".parse::<UserCategory>().unwrap_err();
        assert_eq!(err.kind, "category");
        assert_eq!(err.to_string(), "invalid category value: 'plumbing'");
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&CallOutcome::NotInterested).unwrap();
        assert_eq!(json, "\"not_interested\"");
        let role: UserRole = serde_json::from_str("\"superadmin\"").unwrap();
        assert!(role.is_admin());
        assert!(!UserRole::User.is_admin());
    }

    #[test]
    fn category_titles() {
        assert_eq!(UserCategory::RealEstate.title(), "Real Estate");
        assert_eq!(UserCategory::Sales.title(), "Sales");
    }
}
