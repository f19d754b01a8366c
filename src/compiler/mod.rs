//! Compilers turning comment blocks into document fragments.
//!
//! A block whose first tag is `@typedef` becomes a definition; any other block is
//! read as a route block and becomes path and tag fragments.

pub mod annotations;
pub mod operation;
pub mod typedef;

use crate::comment::CommentBlock;
use crate::error::CompileError;
use crate::fragment::Fragment;
use indexmap::IndexMap;

pub use operation::{compile_operations, CompiledOperations};
pub use typedef::compile_typedef;

/// Compiles one block into the fragments it contributes.
///
/// # Errors
///
/// Returns a [`CompileError`] when a typedef, property or parameter is missing its name.
pub fn compile_block(block: &CommentBlock) -> Result<Vec<Fragment>, CompileError> {
    if block.is_typedef() {
        let (name, definition) = compile_typedef(&block.tags)?;
        let mut definitions = IndexMap::new();
        definitions.insert(name, definition);
        return Ok(vec![Fragment::Definitions(definitions)]);
    }

    let compiled = compile_operations(block)?;
    Ok(vec![
        Fragment::Paths(compiled.paths),
        Fragment::Tags(compiled.tags),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::Tag;

    #[test]
    fn test_typedef_block_yields_definition() {
        let block = CommentBlock::new(
            "A pet",
            vec![
                Tag::new("typedef", "").with_name("Pet"),
                Tag::new("property", "").with_name("id.required").with_type("integer"),
            ],
        );
        let fragments = compile_block(&block).unwrap();

        assert_eq!(fragments.len(), 1);
        match &fragments[0] {
            Fragment::Definitions(definitions) => {
                assert_eq!(definitions["Pet"].required, Some(vec!["id".to_string()]));
            }
            other => panic!("expected definitions, got {other:?}"),
        }
    }

    #[test]
    fn test_route_block_yields_paths_and_tags() {
        let block = CommentBlock::new(
            "",
            vec![
                Tag::new("route", "GET /pets"),
                Tag::new("group", "pets - Pet store"),
            ],
        );
        let fragments = compile_block(&block).unwrap();

        assert_eq!(fragments.len(), 2);
        assert!(matches!(&fragments[0], Fragment::Paths(paths) if paths.contains_key("/pets")));
        assert!(matches!(&fragments[1], Fragment::Tags(tags) if tags[0].name == "pets"));
    }

    #[test]
    fn test_typedef_must_come_first() {
        // A later typedef tag does not turn a route block into a definition
        let block = CommentBlock::new(
            "",
            vec![
                Tag::new("route", "GET /pets"),
                Tag::new("typedef", "").with_name("Pet"),
            ],
        );
        let fragments = compile_block(&block).unwrap();
        assert!(matches!(&fragments[0], Fragment::Paths(_)));
    }

    #[test]
    fn test_compile_error_is_propagated() {
        let block = CommentBlock::new("", vec![Tag::new("typedef", "")]);
        assert_eq!(compile_block(&block), Err(CompileError::MissingTypedefName));
    }
}
