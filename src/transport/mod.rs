//! Transport layer for broker communication
//!
//! The AMQP wire protocol itself is delegated to the `lapin` client; this
//! module only owns the plumbing around it: endpoint/URI assembly from the
//! probe configuration, tokio-flavored connection properties, and the
//! conversions between probe types and protocol types.

pub mod amqp;
