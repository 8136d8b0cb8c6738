//! Inbound adapters that translate external requests into domain port calls.
//!
//! Framework details stay at this edge; handlers only see the driving ports.

pub mod http;
