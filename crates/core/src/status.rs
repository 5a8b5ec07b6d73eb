//! String-valued lifecycle enums shared by every layer.
//!
//! Each enum serializes to the exact lowercase string stored in documents
//! and accepted on the wire.

use crate::error::CoreError;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $val)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// The stored string value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $val ),+
                }
            }

            /// Parse a stored string value.
            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $( $val => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::CoreError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::parse(value).ok_or_else(|| {
                    let valid: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                    $crate::error::CoreError::Validation(format!(
                        "Invalid {} '{value}'. Must be one of: {}",
                        stringify!($name),
                        valid.join(", ")
                    ))
                })
            }
        }
    };
}

pub(crate) use define_status_enum;

define_status_enum! {
    /// Beat catalog visibility.
    BeatStatus {
        Draft = "draft",
        Published = "published",
        Archived = "archived",
    }
}

define_status_enum! {
    /// Order lifecycle.
    OrderStatus {
        Pending = "pending",
        Processing = "processing",
        Completed = "completed",
        Failed = "failed",
        Refunded = "refunded",
        Cancelled = "cancelled",
    }
}

define_status_enum! {
    /// Kind of editorial content.
    ContentType {
        Blog = "blog",
        News = "news",
        Tutorial = "tutorial",
        Press = "press",
    }
}

define_status_enum! {
    /// Editorial content lifecycle.
    ContentStatus {
        Draft = "draft",
        Published = "published",
        Scheduled = "scheduled",
        Archived = "archived",
    }
}

define_status_enum! {
    /// Collaboration pipeline stage.
    ///
    /// Declaration order is pipeline order; `Cancelled` sits outside it.
    CollaborationStatus {
        Inquiry = "inquiry",
        Negotiating = "negotiating",
        Agreed = "agreed",
        ContractSent = "contract_sent",
        Signed = "signed",
        InProgress = "in_progress",
        Completed = "completed",
        Cancelled = "cancelled",
    }
}

define_status_enum! {
    /// Collaboration kind.
    CollaborationType {
        MusicVideo = "music_video",
        LivePerformance = "live_performance",
        StudioSession = "studio_session",
        Event = "event",
        Other = "other",
    }
}

define_status_enum! {
    /// Collaboration payment progress.
    PaymentStatus {
        Unpaid = "unpaid",
        Partial = "partial",
        Paid = "paid",
    }
}

define_status_enum! {
    /// Review state of collab and artist-role requests.
    RequestStatus {
        Pending = "pending",
        Approved = "approved",
        Rejected = "rejected",
    }
}

impl OrderStatus {
    /// Whether the order still awaits fulfilment.
    pub fn is_open(self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Processing)
    }
}

impl RequestStatus {
    /// Reject a review decision on a request that was already decided.
    pub fn ensure_pending(self, entity: &str) -> Result<(), CoreError> {
        if self == RequestStatus::Pending {
            Ok(())
        } else {
            Err(CoreError::Conflict(format!(
                "{entity} has already been {}",
                self.as_str()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn serializes_to_stored_strings() {
        assert_eq!(
            serde_json::to_value(CollaborationStatus::ContractSent).unwrap(),
            serde_json::json!("contract_sent")
        );
        assert_eq!(
            serde_json::from_value::<OrderStatus>(serde_json::json!("refunded")).unwrap(),
            OrderStatus::Refunded
        );
    }

    #[test]
    fn parse_round_trips_every_variant() {
        for status in CollaborationStatus::ALL {
            assert_eq!(CollaborationStatus::parse(status.as_str()), Some(*status));
        }
    }

    #[test]
    fn from_str_lists_valid_values() {
        let err = "shipped".parse::<OrderStatus>().unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("pending, processing"));
    }

    #[test]
    fn open_orders() {
        assert!(OrderStatus::Pending.is_open());
        assert!(OrderStatus::Processing.is_open());
        assert!(!OrderStatus::Completed.is_open());
    }

    #[test]
    fn decided_requests_cannot_be_decided_again() {
        assert!(RequestStatus::Pending.ensure_pending("Request").is_ok());
        assert_matches!(
            RequestStatus::Approved.ensure_pending("Request"),
            Err(CoreError::Conflict(_))
        );
    }
}
