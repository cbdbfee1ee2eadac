//! Alias-based identification of dataset elements.
//!
//! Modeling centers spell the same concept differently (`time`, `Time`,
//! `TIME`). An [`ElementDef`] lists the accepted spellings in priority order;
//! the element types match it against the right candidate set:
//!
//! | Element                     | Candidates                         |
//! |-----------------------------|------------------------------------|
//! | [`VariableElement`]         | dataset variable names             |
//! | [`DimensionElement`]        | dataset dimension names            |
//! | [`AttributeElement`]        | owning variable's attribute names  |
//! | [`DatasetAttributeElement`] | global attribute names             |
//!
//! ```ignore
//! let time = VariableElement::new(&ds, &standard::time())?;
//! println!("{} -> {:?}", time.name(), time.attribute_value("units"));
//! ```

pub mod element;
pub mod error;
pub mod matcher;
pub mod standard;

pub use element::{AttributeElement, DatasetAttributeElement, DimensionElement, VariableElement};
pub use error::{ElementError, ElementResult};
pub use matcher::{match_name, ElementDef, FormatHook, VariableDef};
