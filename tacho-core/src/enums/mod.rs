//! Wire enumerations
//!
//! Each enumeration declares, per member, the one-byte wire code it maps to.
//! The tables are explicit `const` data: a code decodes to exactly one
//! declared member, or to `Unrecognized(code)` which keeps the byte so it
//! re-encodes unchanged. Every enumeration also has an `Unspecified` member
//! with no wire code; encoding it is an error.

use crate::error::{TachoError, TachoResult};

/// A closed enumeration with declared one-byte wire codes
pub trait WireEnum: Sized + Copy + PartialEq + 'static {
    /// Name used in error context
    const NAME: &'static str;

    /// Declared members and their wire codes
    const TABLE: &'static [(Self, u8)];

    /// Build the member that keeps an undeclared code
    fn unrecognized(code: u8) -> Self;

    /// Raw code kept by the unrecognized member, if this is it
    fn unrecognized_code(&self) -> Option<u8>;

    /// Decode a wire code
    ///
    /// Never fails: undeclared codes produce the unrecognized member.
    fn from_wire(code: u8) -> Self {
        Self::TABLE
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(member, _)| *member)
            .unwrap_or_else(|| Self::unrecognized(code))
    }

    /// Encode to the wire code
    ///
    /// # Errors
    /// [`TachoError::NoWireCode`] when the member declares no code
    /// (`Unspecified`).
    fn to_wire(&self) -> TachoResult<u8> {
        if let Some(code) = self.unrecognized_code() {
            return Ok(code);
        }
        Self::TABLE
            .iter()
            .find(|(member, _)| member == self)
            .map(|(_, code)| *code)
            .ok_or(TachoError::NoWireCode { context: Self::NAME })
    }

    /// Whether the value decoded from an undeclared code
    fn is_unrecognized(&self) -> bool {
        self.unrecognized_code().is_some()
    }
}

/// Check that a table maps codes and members one-to-one
///
/// Fails when two members share a code, when one member is listed twice,
/// or when a declared code does not decode back to its member.
pub fn validate_table<E: WireEnum + std::fmt::Debug>() -> TachoResult<()> {
    for (i, (member, code)) in E::TABLE.iter().enumerate() {
        for (other_member, other_code) in &E::TABLE[i + 1..] {
            if code == other_code {
                return Err(TachoError::InvalidData(format!(
                    "{}: code 0x{:02X} declared by {:?} and {:?}",
                    E::NAME,
                    code,
                    member,
                    other_member
                )));
            }
            if member == other_member {
                return Err(TachoError::InvalidData(format!(
                    "{}: member {:?} declared twice",
                    E::NAME,
                    member
                )));
            }
        }
        if E::from_wire(*code) != *member || member.to_wire()? != *code {
            return Err(TachoError::InvalidData(format!(
                "{}: {:?} does not round-trip through 0x{:02X}",
                E::NAME,
                member,
                code
            )));
        }
    }
    Ok(())
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:expr, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Default,
            serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            /// Placeholder with no wire code
            #[default]
            Unspecified,
            $( $(#[$vmeta])* $variant, )*
            /// Undeclared wire code, kept verbatim
            Unrecognized(u8),
        }

        impl $crate::enums::WireEnum for $name {
            const NAME: &'static str = stringify!($name);
            const TABLE: &'static [(Self, u8)] = &[ $( ($name::$variant, $code), )* ];

            fn unrecognized(code: u8) -> Self {
                $name::Unrecognized(code)
            }

            fn unrecognized_code(&self) -> Option<u8> {
                match self {
                    $name::Unrecognized(code) => Some(*code),
                    _ => None,
                }
            }
        }
    };
}

pub mod code_page;
pub mod entry_type_daily_work_period;
pub mod equipment_type;
pub mod event_fault_type;
pub mod nation_numeric;
pub mod position_authentication_status;
pub mod specific_condition_type;

pub use code_page::CodePage;
pub use entry_type_daily_work_period::EntryTypeDailyWorkPeriod;
pub use equipment_type::EquipmentType;
pub use event_fault_type::EventFaultType;
pub use nation_numeric::NationNumeric;
pub use position_authentication_status::PositionAuthenticationStatus;
pub use specific_condition_type::SpecificConditionType;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tables_are_consistent() {
        validate_table::<CodePage>().unwrap();
        validate_table::<EntryTypeDailyWorkPeriod>().unwrap();
        validate_table::<EquipmentType>().unwrap();
        validate_table::<EventFaultType>().unwrap();
        validate_table::<NationNumeric>().unwrap();
        validate_table::<PositionAuthenticationStatus>().unwrap();
        validate_table::<SpecificConditionType>().unwrap();
    }

    #[test]
    fn test_unrecognized_code_is_preserved() {
        // EventFaultType declares no member for 0xFF
        let value = EventFaultType::from_wire(0xFF);
        assert_eq!(value, EventFaultType::Unrecognized(0xFF));
        assert!(value.is_unrecognized());
        assert_eq!(value.to_wire().unwrap(), 0xFF);
    }

    #[test]
    fn test_unspecified_has_no_wire_code() {
        assert_eq!(
            EquipmentType::Unspecified.to_wire(),
            Err(TachoError::NoWireCode { context: "EquipmentType" })
        );
    }

    #[test]
    fn test_declared_code_never_unrecognized() {
        for (member, code) in NationNumeric::TABLE {
            assert!(!NationNumeric::from_wire(*code).is_unrecognized());
            assert_eq!(NationNumeric::from_wire(*code), *member);
        }
    }

    wire_enum! {
        enum Broken {
            First = 1,
            Second = 1,
        }
    }

    #[test]
    fn test_validate_detects_duplicate_codes() {
        assert!(validate_table::<Broken>().is_err());
    }
}
