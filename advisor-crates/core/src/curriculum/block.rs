use crate::containers::HashSet;

crate::storage_key!(
    /// Addresses a [`Block`] inside a [`Curriculum`](super::Curriculum).
    pub BlockId
);

/// A node of a curriculum tree.
#[derive(Debug, Clone)]
pub enum Block {
    /// A requirement made of sub-requirements.
    Combination(Combination),
    /// A requirement fulfilled directly by courses.
    Leaf(Leaf),
}

#[derive(Debug, Clone)]
pub struct Combination {
    pub code: String,
    pub name: Option<String>,
    /// The credits needed to fulfil the block; `None` requires all of its children.
    pub cap: Option<u32>,
    pub children: Vec<BlockId>,
}

#[derive(Debug, Clone)]
pub struct Leaf {
    pub code: String,
    pub name: Option<String>,
    pub cap: u32,
    /// The course and equivalence codes accepted by this leaf.
    pub codes: HashSet<String>,
    /// Leaves in different layers never compete for the same course.
    pub layer: String,
    /// Added to the cost of assigning any course to this leaf.
    pub cost: i64,
}

impl Combination {
    pub fn new(code: impl Into<String>, cap: Option<u32>, children: Vec<BlockId>) -> Combination {
        Combination {
            code: code.into(),
            name: None,
            cap,
            children,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Combination {
        self.name = Some(name.into());
        self
    }
}

impl Leaf {
    pub fn new(
        code: impl Into<String>,
        cap: u32,
        codes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Leaf {
        Leaf {
            code: code.into(),
            name: None,
            cap,
            codes: codes.into_iter().map(Into::into).collect(),
            layer: String::new(),
            cost: 0,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Leaf {
        self.name = Some(name.into());
        self
    }

    pub fn in_layer(mut self, layer: impl Into<String>) -> Leaf {
        self.layer = layer.into();
        self
    }

    pub fn with_cost(mut self, cost: i64) -> Leaf {
        self.cost = cost;
        self
    }

    pub fn accepts(&self, code: &str) -> bool {
        self.codes.contains(code)
    }
}

impl Block {
    pub fn code(&self) -> &str {
        match self {
            Block::Combination(combination) => &combination.code,
            Block::Leaf(leaf) => &leaf.code,
        }
    }

    /// The human readable name, falling back to the code.
    pub fn display_name(&self) -> &str {
        let name = match self {
            Block::Combination(combination) => combination.name.as_deref(),
            Block::Leaf(leaf) => leaf.name.as_deref(),
        };
        name.unwrap_or_else(|| self.code())
    }

    pub fn children(&self) -> &[BlockId] {
        match self {
            Block::Combination(combination) => &combination.children,
            Block::Leaf(_) => &[],
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Block::Leaf(leaf) => Some(leaf),
            Block::Combination(_) => None,
        }
    }
}

impl From<Leaf> for Block {
    fn from(leaf: Leaf) -> Self {
        Block::Leaf(leaf)
    }
}

impl From<Combination> for Block {
    fn from(combination: Combination) -> Self {
        Block::Combination(combination)
    }
}
