use crate::db::DatabaseError;

/// Macro to generate enums stored as their wire string: `as_str`,
/// `FromStr`, and serde impls that use the same representation.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

str_enum!(Role {
    Doctor => "doctor",
    Patient => "patient",
});

str_enum!(Gender {
    Male => "Male",
    Female => "Female",
    Other => "Other",
});

str_enum!(AppointmentStatus {
    Scheduled => "scheduled",
    CheckedIn => "checked_in",
    InProgress => "in_progress",
    Completed => "completed",
    CancelledByPatient => "cancelled_by_patient",
    DoctorUnavailable => "doctor_unavailable",
});

impl Role {
    /// Message shown when an account of the other role hits this role's
    /// surface, matching the login error copy.
    pub fn access_denied_message(&self) -> &'static str {
        match self {
            Self::Doctor => "Doctor access only",
            Self::Patient => "Patient access only",
        }
    }

    pub fn login_url(&self) -> &'static str {
        match self {
            Self::Doctor => "/doctor/login",
            Self::Patient => "/patient/login",
        }
    }

    pub fn dashboard_url(&self) -> &'static str {
        match self {
            Self::Doctor => "/doctor/dashboard",
            Self::Patient => "/patient/dashboard",
        }
    }
}

impl AppointmentStatus {
    /// Terminal states admit no further patient-side transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::CancelledByPatient | Self::DoctorUnavailable
        )
    }
}
