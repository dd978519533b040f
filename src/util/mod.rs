//! Utility modules for xmloutput.
//!
//! Contains `QName` handling and the XML whitespace helpers shared by the
//! walker and the outputters.

pub mod qname;
pub mod text;
