// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

#[cfg(feature = "tracing")]
pub use tracing::{debug, info, instrument, trace};

#[cfg(not(feature = "tracing"))]
pub use vp8_macros::noop as instrument;

// `warn` and `error` are left out: a glob import of a local `warn` macro
// is ambiguous with the builtin `warn` attribute.
#[cfg(not(feature = "tracing"))]
mod noop_macros {
    #![allow(unused_macros, unused_imports)]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }
    macro_rules! info {
        ($($arg:tt)*) => {};
    }
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }
    pub(crate) use {debug, info, trace};
}

#[cfg(not(feature = "tracing"))]
#[allow(unused_imports)]
pub(crate) use noop_macros::*;

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[instrument(level = "debug", skip_all)]
    fn logged(value: usize) -> usize {
        debug!(value, "debug");
        info!(value, "info");
        trace!(?value);
        value + 1
    }

    #[test]
    #[warn(unused_variables)]
    fn macros_expand_next_to_lint_attributes() {
        assert_eq!(logged(1), 2);
    }
}
