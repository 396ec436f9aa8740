//! [`Handler`] abstraction.

use std::future::Future;

/// Something able to execute an operation of `Args` type.
///
/// Commands, queries and storage back-ends are all [`Handler`]s, each
/// implementing it once per operation it supports.
pub trait Handler<Args = ()> {
    /// Result of a successful execution.
    type Ok;

    /// Error of a failed execution.
    type Err;

    /// Executes the provided operation.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
