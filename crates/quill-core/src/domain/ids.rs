use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! id_type {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

id_type!(TitleId);
id_type!(SubmissionId);
id_type!(PublisherId);
id_type!(QueueId);
id_type!(QueueEntryId);
id_type!(TagId);

#[cfg(test)]
mod tests {
    use super::TitleId;
    use std::str::FromStr;

    #[test]
    fn parse_trims_whitespace() {
        assert_eq!(TitleId::from_str(" 42 ").unwrap(), TitleId(42));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(TitleId::from_str("forty-two").is_err());
    }
}
