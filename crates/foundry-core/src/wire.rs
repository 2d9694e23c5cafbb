//! Recipe wire encoding.
//!
//! A hand-rolled little-endian sequential encoding for shipping recipes
//! across a process boundary, with no padding. Field order is fixed:
//! id, inputs, outputs, process_ticks, energy_cost. Strings and lists
//! are length-prefixed with a `u32`.

use crate::id::ItemKindId;
use crate::item::ItemStack;
use crate::recipe::{Ingredient, IngredientMatcher, Recipe};
use thiserror::Error;

const TAG_EXACT: u8 = 0;
const TAG_ONE_OF: u8 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("unexpected end of input at byte {0}")]
    UnexpectedEof(usize),
    #[error("unknown ingredient matcher tag {0}")]
    InvalidTag(u8),
    #[error("recipe id is not valid UTF-8")]
    InvalidUtf8,
    #[error("{0} trailing bytes after recipe")]
    TrailingBytes(usize),
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

pub fn encode_recipe(recipe: &Recipe) -> Vec<u8> {
    let mut out = Vec::new();

    write_u32(&mut out, recipe.id.len() as u32);
    out.extend_from_slice(recipe.id.as_bytes());

    write_u32(&mut out, recipe.inputs.len() as u32);
    for ingredient in &recipe.inputs {
        match &ingredient.matcher {
            IngredientMatcher::Exact(kind) => {
                out.push(TAG_EXACT);
                write_u32(&mut out, kind.0);
            }
            IngredientMatcher::OneOf(kinds) => {
                out.push(TAG_ONE_OF);
                write_u32(&mut out, kinds.len() as u32);
                for kind in kinds {
                    write_u32(&mut out, kind.0);
                }
            }
        }
        write_u32(&mut out, ingredient.quantity);
    }

    write_u32(&mut out, recipe.outputs.len() as u32);
    for output in &recipe.outputs {
        write_u32(&mut out, output.kind.0);
        write_u32(&mut out, output.count);
    }

    write_u32(&mut out, recipe.process_ticks);
    write_u32(&mut out, recipe.energy_cost);
    out
}

fn write_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode one recipe. The input must contain exactly one encoded recipe;
/// leftover bytes are an error.
pub fn decode_recipe(data: &[u8]) -> Result<Recipe, WireError> {
    let mut reader = Reader { data, pos: 0 };

    let id_len = reader.read_u32()? as usize;
    let id_bytes = reader.read_bytes(id_len)?;
    let id = std::str::from_utf8(id_bytes)
        .map_err(|_| WireError::InvalidUtf8)?
        .to_string();

    let input_count = reader.read_u32()? as usize;
    let mut inputs = Vec::with_capacity(input_count.min(1024));
    for _ in 0..input_count {
        let matcher = match reader.read_u8()? {
            TAG_EXACT => IngredientMatcher::Exact(ItemKindId(reader.read_u32()?)),
            TAG_ONE_OF => {
                let kind_count = reader.read_u32()? as usize;
                let mut kinds = Vec::with_capacity(kind_count.min(1024));
                for _ in 0..kind_count {
                    kinds.push(ItemKindId(reader.read_u32()?));
                }
                IngredientMatcher::OneOf(kinds)
            }
            tag => return Err(WireError::InvalidTag(tag)),
        };
        let quantity = reader.read_u32()?;
        inputs.push(Ingredient { matcher, quantity });
    }

    let output_count = reader.read_u32()? as usize;
    let mut outputs = Vec::with_capacity(output_count.min(1024));
    for _ in 0..output_count {
        let kind = ItemKindId(reader.read_u32()?);
        let count = reader.read_u32()?;
        outputs.push(ItemStack::new(kind, count));
    }

    let process_ticks = reader.read_u32()?;
    let energy_cost = reader.read_u32()?;

    if reader.pos != data.len() {
        return Err(WireError::TrailingBytes(data.len() - reader.pos));
    }

    Ok(Recipe {
        id,
        inputs,
        outputs,
        process_ticks,
        energy_cost,
    })
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], WireError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&e| e <= self.data.len())
            .ok_or(WireError::UnexpectedEof(self.pos))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn read_u8(&mut self) -> Result<u8, WireError> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_u32(&mut self) -> Result<u32, WireError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}
