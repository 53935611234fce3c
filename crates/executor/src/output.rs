//! Output enum for command execution results.
//!
//! Every command produces exactly one output variant, documented on the
//! command.

use serde::{Deserialize, Serialize};

use docbridge_core::Value;
use docbridge_engine::ConnectionReport;

/// Successful command execution results.
///
/// ```text
/// match executor.execute(&subject, Command::Get { connection, bucket, id })? {
///     Output::Document(doc) => println!("{:?}", doc),
///     _ => unreachable!("Get always returns Document"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// A document's content
    Document(Value),

    /// A document's content, if the store returned one
    MaybeDocument(Option<Value>),

    /// Documents in result order
    Documents(Vec<Value>),

    /// Bucket or connection names
    Names(Vec<String>),

    /// Boolean result
    Bool(bool),

    /// Connection status report
    Report(ConnectionReport),
}
