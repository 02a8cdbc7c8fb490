//! The two closed allow-lists of recognized configuration property names.
//!
//! A key at the top level of a task or target section is a *direct* property;
//! a key inside its `options` table is an *options* property. Every other key
//! is foreign: it is never copied into the resolved options, though it may
//! trigger a casing or placement warning.

use std::fmt;

/// Properties recognized at the top level of a task or target section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DirectProperty {
    /// HTML files to wrap as TypeScript modules.
    Html,
    /// Output directory for generated HTML modules.
    HtmlOutDir,
    /// Whether to flatten the HTML output directory.
    HtmlOutDirFlatten,
    /// Path of the reference file to maintain.
    Reference,
    /// Test command to execute after compilation.
    TestExecute,
    /// tsconfig.json integration settings.
    Tsconfig,
    /// templateCache generation settings.
    TemplateCache,
    /// Visual Studio project integration settings.
    Vs,
    /// Directory to watch for changes.
    Watch,
}

impl DirectProperty {
    /// All direct properties in allow-list order.
    pub const ALL: [DirectProperty; 9] = [
        DirectProperty::Html,
        DirectProperty::HtmlOutDir,
        DirectProperty::HtmlOutDirFlatten,
        DirectProperty::Reference,
        DirectProperty::TestExecute,
        DirectProperty::Tsconfig,
        DirectProperty::TemplateCache,
        DirectProperty::Vs,
        DirectProperty::Watch,
    ];

    /// Returns the canonical configuration key.
    pub fn name(self) -> &'static str {
        match self {
            DirectProperty::Html => "html",
            DirectProperty::HtmlOutDir => "htmlOutDir",
            DirectProperty::HtmlOutDirFlatten => "htmlOutDirFlatten",
            DirectProperty::Reference => "reference",
            DirectProperty::TestExecute => "testExecute",
            DirectProperty::Tsconfig => "tsconfig",
            DirectProperty::TemplateCache => "templateCache",
            DirectProperty::Vs => "vs",
            DirectProperty::Watch => "watch",
        }
    }

    /// Looks up a property by its exact canonical key.
    pub fn from_name(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == key)
    }

    /// Looks up a property by key, ignoring ASCII case.
    pub fn from_name_ignore_case(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for DirectProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Properties recognized inside the `options` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionProperty {
    /// Extra raw flags appended to the compiler command line.
    AdditionalFlags,
    /// Legacy inverse of `removeComments`.
    Comments,
    /// Whether to invoke the compiler at all.
    Compile,
    /// Path of a custom compiler executable.
    Compiler,
    /// `--declaration`.
    Declaration,
    /// `--emitDecoratorMetadata`.
    EmitDecoratorMetadata,
    /// `--experimentalDecorators`.
    ExperimentalDecorators,
    /// Whether type errors fail the task.
    FailOnTypeErrors,
    /// Fast (incremental) compilation mode.
    Fast,
    /// Template for HTML module names.
    HtmlModuleTemplate,
    /// Template for HTML variable names.
    HtmlVarTemplate,
    /// `--inlineSourceMap`.
    InlineSourceMap,
    /// `--inlineSources`.
    InlineSources,
    /// `--isolatedModules`.
    IsolatedModules,
    /// `--mapRoot`.
    MapRoot,
    /// `--module`.
    Module,
    /// `--newLine`.
    NewLine,
    /// `--noEmit`.
    NoEmit,
    /// `--noEmitHelpers`.
    NoEmitHelpers,
    /// `--noImplicitAny`.
    NoImplicitAny,
    /// `--noResolve`.
    NoResolve,
    /// `--preserveConstEnums`.
    PreserveConstEnums,
    /// `--removeComments`.
    RemoveComments,
    /// `--sourceRoot`.
    SourceRoot,
    /// `--sourcemap`.
    SourceMap,
    /// `--suppressImplicitAnyIndexErrors`.
    SuppressImplicitAnyIndexErrors,
    /// `--target`.
    Target,
    /// Log the full compiler command line.
    Verbose,
}

impl OptionProperty {
    /// All options properties in allow-list order.
    pub const ALL: [OptionProperty; 28] = [
        OptionProperty::AdditionalFlags,
        OptionProperty::Comments,
        OptionProperty::Compile,
        OptionProperty::Compiler,
        OptionProperty::Declaration,
        OptionProperty::EmitDecoratorMetadata,
        OptionProperty::ExperimentalDecorators,
        OptionProperty::FailOnTypeErrors,
        OptionProperty::Fast,
        OptionProperty::HtmlModuleTemplate,
        OptionProperty::HtmlVarTemplate,
        OptionProperty::InlineSourceMap,
        OptionProperty::InlineSources,
        OptionProperty::IsolatedModules,
        OptionProperty::MapRoot,
        OptionProperty::Module,
        OptionProperty::NewLine,
        OptionProperty::NoEmit,
        OptionProperty::NoEmitHelpers,
        OptionProperty::NoImplicitAny,
        OptionProperty::NoResolve,
        OptionProperty::PreserveConstEnums,
        OptionProperty::RemoveComments,
        OptionProperty::SourceRoot,
        OptionProperty::SourceMap,
        OptionProperty::SuppressImplicitAnyIndexErrors,
        OptionProperty::Target,
        OptionProperty::Verbose,
    ];

    /// Returns the canonical configuration key.
    pub fn name(self) -> &'static str {
        match self {
            OptionProperty::AdditionalFlags => "additionalFlags",
            OptionProperty::Comments => "comments",
            OptionProperty::Compile => "compile",
            OptionProperty::Compiler => "compiler",
            OptionProperty::Declaration => "declaration",
            OptionProperty::EmitDecoratorMetadata => "emitDecoratorMetadata",
            OptionProperty::ExperimentalDecorators => "experimentalDecorators",
            OptionProperty::FailOnTypeErrors => "failOnTypeErrors",
            OptionProperty::Fast => "fast",
            OptionProperty::HtmlModuleTemplate => "htmlModuleTemplate",
            OptionProperty::HtmlVarTemplate => "htmlVarTemplate",
            OptionProperty::InlineSourceMap => "inlineSourceMap",
            OptionProperty::InlineSources => "inlineSources",
            OptionProperty::IsolatedModules => "isolatedModules",
            OptionProperty::MapRoot => "mapRoot",
            OptionProperty::Module => "module",
            OptionProperty::NewLine => "newLine",
            OptionProperty::NoEmit => "noEmit",
            OptionProperty::NoEmitHelpers => "noEmitHelpers",
            OptionProperty::NoImplicitAny => "noImplicitAny",
            OptionProperty::NoResolve => "noResolve",
            OptionProperty::PreserveConstEnums => "preserveConstEnums",
            OptionProperty::RemoveComments => "removeComments",
            OptionProperty::SourceRoot => "sourceRoot",
            OptionProperty::SourceMap => "sourceMap",
            OptionProperty::SuppressImplicitAnyIndexErrors => "suppressImplicitAnyIndexErrors",
            OptionProperty::Target => "target",
            OptionProperty::Verbose => "verbose",
        }
    }

    /// Looks up a property by its exact canonical key.
    pub fn from_name(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == key)
    }

    /// Looks up a property by key, ignoring ASCII case.
    pub fn from_name_ignore_case(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for OptionProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_lookup_is_case_sensitive() {
        assert_eq!(
            DirectProperty::from_name("htmlOutDir"),
            Some(DirectProperty::HtmlOutDir)
        );
        assert_eq!(DirectProperty::from_name("htmloutdir"), None);
        assert_eq!(
            OptionProperty::from_name("sourceMap"),
            Some(OptionProperty::SourceMap)
        );
        assert_eq!(OptionProperty::from_name("sourcemap"), None);
    }

    #[test]
    fn case_insensitive_lookup_finds_canonical() {
        assert_eq!(
            DirectProperty::from_name_ignore_case("WATCH"),
            Some(DirectProperty::Watch)
        );
        assert_eq!(
            OptionProperty::from_name_ignore_case("sourcemap"),
            Some(OptionProperty::SourceMap)
        );
        assert_eq!(OptionProperty::from_name_ignore_case("src"), None);
    }

    #[test]
    fn names_round_trip_through_lookup() {
        for prop in DirectProperty::ALL {
            assert_eq!(DirectProperty::from_name(prop.name()), Some(prop));
        }
        for prop in OptionProperty::ALL {
            assert_eq!(OptionProperty::from_name(prop.name()), Some(prop));
        }
    }

    #[test]
    fn allow_lists_do_not_overlap() {
        for prop in DirectProperty::ALL {
            assert!(OptionProperty::from_name_ignore_case(prop.name()).is_none());
        }
    }

    #[test]
    fn display_uses_canonical_key() {
        assert_eq!(
            OptionProperty::SuppressImplicitAnyIndexErrors.to_string(),
            "suppressImplicitAnyIndexErrors"
        );
        assert_eq!(DirectProperty::TestExecute.to_string(), "testExecute");
    }
}
