//! Documented defaults applied to options the user left unset.

use crate::types::FastMode;

/// Emit `.map` files when neither `sourceMap` nor `inlineSourceMap` is set.
pub const SOURCE_MAP: bool = true;

/// Language target version.
pub const TARGET: &str = "es5";

/// Fast compilation mode.
pub const FAST: FastMode = FastMode::Never;

/// Invoke the compiler.
pub const COMPILE: bool = true;

/// Treat type errors as failures.
pub const FAIL_ON_TYPE_ERRORS: bool = true;

/// Flatten the HTML output directory.
pub const HTML_OUT_DIR_FLATTEN: bool = false;

/// Template for HTML module names.
pub const HTML_MODULE_TEMPLATE: &str = "<%= filename %>";

/// Template for HTML variable names.
pub const HTML_VAR_TEMPLATE: &str = "<%= ext %>";

/// Strip comments when neither `removeComments` nor `comments` is set.
pub const REMOVE_COMMENTS: bool = true;
