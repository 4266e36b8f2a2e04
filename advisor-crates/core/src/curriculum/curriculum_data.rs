use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use super::block::BlockId;
use super::block::Combination;
use super::block::Leaf;
use super::curriculum_error::CurriculumError;
use super::curriculum_tree::Curriculum;
use super::curriculum_tree::CurriculumBuilder;
use super::filler::Filler;
use super::multiplicity::Multiplicity;
use crate::catalog::CourseCatalog;

/// The capacity value meaning "the sum of the capacities of the children".
pub const SUM_OF_CHILDREN: i64 = -1;

/// The serialized form of a curriculum, as produced by the curriculum data pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurriculumData {
    pub root: BlockData,
    #[serde(default)]
    pub fillers: BTreeMap<String, Vec<Filler>>,
    #[serde(default)]
    pub multiplicity: BTreeMap<String, Multiplicity>,
}

/// A nested curriculum block; `cap` may be [`SUM_OF_CHILDREN`] on combinations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockData {
    Combination {
        code: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default = "sum_of_children")]
        cap: i64,
        children: Vec<BlockData>,
    },
    Leaf {
        code: String,
        #[serde(default)]
        name: Option<String>,
        cap: i64,
        codes: Vec<String>,
        #[serde(default)]
        layer: String,
        #[serde(default)]
        cost: i64,
    },
}

fn sum_of_children() -> i64 {
    SUM_OF_CHILDREN
}

impl CurriculumData {
    /// Builds and validates the curriculum.
    pub fn build(self, catalog: &CourseCatalog) -> Result<Curriculum, CurriculumError> {
        let mut builder = CurriculumBuilder::default();
        let root = add_block(&mut builder, self.root)?;
        builder.set_root(root);
        for (code, fillers) in self.fillers {
            for filler in fillers {
                builder.add_filler(code.clone(), filler);
            }
        }
        for (code, multiplicity) in self.multiplicity {
            builder.set_multiplicity(code, multiplicity);
        }
        builder.build(catalog)
    }
}

fn add_block(builder: &mut CurriculumBuilder, data: BlockData) -> Result<BlockId, CurriculumError> {
    match data {
        BlockData::Combination {
            code,
            name,
            cap,
            children,
        } => {
            let cap = match cap {
                SUM_OF_CHILDREN => None,
                cap => Some(checked_cap(&code, cap)?),
            };
            let children = children
                .into_iter()
                .map(|child| add_block(builder, child))
                .collect::<Result<Vec<_>, _>>()?;
            let mut combination = Combination::new(code, cap, children);
            combination.name = name;
            Ok(builder.add_combination(combination))
        }
        BlockData::Leaf {
            code,
            name,
            cap,
            codes,
            layer,
            cost,
        } => {
            let cap = checked_cap(&code, cap)?;
            let mut leaf = Leaf::new(code, cap, codes).in_layer(layer).with_cost(cost);
            leaf.name = name;
            Ok(builder.add_leaf(leaf))
        }
    }
}

fn checked_cap(block: &str, cap: i64) -> Result<u32, CurriculumError> {
    u32::try_from(cap).map_err(|_| CurriculumError::InvalidCapacity {
        block: block.to_owned(),
        cap,
    })
}
