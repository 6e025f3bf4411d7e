//! The root node: a translation unit.

use forge_core::SourceRange;

use crate::declarations::Declaration;
use crate::node::{compare_node_sequences, Envelope, Node, TRANSLATION_UNIT};

#[derive(Debug, Clone)]
pub struct TranslationUnit {
    pub envelope: Envelope,
    pub declarations: Vec<Node>,
}

impl TranslationUnit {
    pub fn new(declarations: Vec<Declaration>, range: SourceRange) -> TranslationUnit {
        TranslationUnit {
            envelope: Envelope::new(&TRANSLATION_UNIT, range),
            declarations: declarations.into_iter().map(Node::Declaration).collect(),
        }
    }

    pub fn declarations(&self) -> Vec<&Declaration> {
        self.declarations
            .iter()
            .map(|n| n.as_declaration().expect("translation unit child must be a Declaration"))
            .collect()
    }

    pub fn compare(&self, other: &TranslationUnit) -> bool {
        compare_node_sequences(&self.declarations, &other.declarations)
    }

    pub fn deep_clone(&self) -> TranslationUnit {
        TranslationUnit {
            envelope: self.envelope.clone(),
            declarations: self.declarations.iter().map(Node::deep_clone).collect(),
        }
    }

    pub fn for_each_direct_child<'a>(&'a self, f: &mut dyn FnMut(&'a Node)) {
        for d in &self.declarations {
            f(d);
        }
    }

    pub fn for_each_direct_child_mut(&mut self, f: &mut dyn FnMut(&mut Node)) {
        for d in &mut self.declarations {
            f(d);
        }
    }
}
