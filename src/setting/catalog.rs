//! Standard catalog of zone protection keys.
//!
//! Embedding environments that do not need custom keys can start from
//! [`standard`]. The typed handles below name the registered ids.

use crate::error::ApiError;
use crate::setting::alt_set::AltSet;
use crate::setting::codec::{BoolCodec, BoolStyle, IntCodec, OptionalTextCodec, StringSetCodec, TextCodec};
use crate::setting::datum::Datum;
use crate::setting::key::{Category, PolyKey, SettingKey, UnaryKey};
use crate::setting::registry::{SettingKeyRegistry, SettingKeyRegistryBuilder};

pub const BLOCK_CHANGE: PolyKey = PolyKey::new("block-change");
pub const INTERACTIVE_BLOCKS: PolyKey = PolyKey::new("interactive-blocks");
pub const SPAWNABLE_ENTITIES: PolyKey = PolyKey::new("spawnable-entities");
pub const HARMFUL_EXPLOSIVES: PolyKey = PolyKey::new("harmful-explosives");
pub const MOVEMENT: PolyKey = PolyKey::new("movement");

pub const PVP: UnaryKey<bool> = UnaryKey::new("pvp");
pub const ENTRY: UnaryKey<bool> = UnaryKey::new("entry");
pub const EXIT: UnaryKey<bool> = UnaryKey::new("exit");
pub const FIRE_SPREAD: UnaryKey<bool> = UnaryKey::new("fire-spread");
pub const LEAF_DECAY: UnaryKey<bool> = UnaryKey::new("leaf-decay");
pub const HUNGER_DRAIN: UnaryKey<bool> = UnaryKey::new("hunger-drain");
pub const ITEM_DROP: UnaryKey<bool> = UnaryKey::new("item-drop");
pub const ITEM_PICKUP: UnaryKey<bool> = UnaryKey::new("item-pickup");
pub const DROP_EXP: UnaryKey<bool> = UnaryKey::new("drop-exp");
pub const GREETING: UnaryKey<Option<String>> = UnaryKey::new("greeting");
pub const FAREWELL: UnaryKey<Option<String>> = UnaryKey::new("farewell");
pub const HEAL_AMOUNT: UnaryKey<i64> = UnaryKey::new("heal-amount");
pub const HEAL_RATE: UnaryKey<i64> = UnaryKey::new("heal-rate");
pub const WAND_ITEM: UnaryKey<String> = UnaryKey::new("wand-item");

fn interactive_blocks_codec() -> StringSetCodec {
    StringSetCodec::new()
        .with_group(
            "doors",
            ["oak_door", "spruce_door", "birch_door", "iron_door", "trapdoor"],
        )
        .with_group("containers", ["chest", "barrel", "furnace", "hopper", "shulker_box"])
        .with_group("redstone", ["lever", "button", "repeater", "comparator"])
}

fn entity_codec() -> StringSetCodec {
    StringSetCodec::new()
        .with_group("animals", ["cow", "pig", "sheep", "chicken", "horse"])
        .with_group("monsters", ["zombie", "skeleton", "creeper", "spider", "enderman"])
        .with_group("vehicles", ["boat", "minecart"])
}

fn toggle(id: &str, default: bool, category: Category, blurb: &str) -> Result<SettingKey, ApiError> {
    SettingKey::unary(id, Datum::Bool(default), BoolCodec::new(BoolStyle::OnOff))
        .category(category)
        .blurb(blurb)
        .build()
}

fn allow(id: &str, category: Category, blurb: &str) -> Result<SettingKey, ApiError> {
    SettingKey::unary(id, Datum::Bool(true), BoolCodec::new(BoolStyle::AllowDeny))
        .category(category)
        .blurb(blurb)
        .player_restrictive()
        .build()
}

/// Register the standard keys into an existing builder.
pub fn register_standard(builder: &mut SettingKeyRegistryBuilder) -> Result<(), ApiError> {
    builder
        .register(
            SettingKey::poly(BLOCK_CHANGE.id(), AltSet::full(), StringSetCodec::new())
                .category(Category::Blocks)
                .blurb("Block changes")
                .description("Kinds of block changes that may happen: break, place, grow, decay")
                .player_restrictive()
                .build()?,
        )?
        .register(
            SettingKey::poly(
                INTERACTIVE_BLOCKS.id(),
                AltSet::full(),
                interactive_blocks_codec(),
            )
            .category(Category::Blocks)
            .blurb("Interactive blocks")
            .description("Blocks that actors may interact with")
            .player_restrictive()
            .build()?,
        )?
        .register(
            SettingKey::poly(SPAWNABLE_ENTITIES.id(), AltSet::full(), entity_codec())
                .category(Category::Entities)
                .blurb("Spawnable entities")
                .description("Entity types that may spawn")
                .build()?,
        )?
        .register(
            SettingKey::poly(
                HARMFUL_EXPLOSIVES.id(),
                AltSet::full(),
                StringSetCodec::new().with_options([
                    "creeper",
                    "tnt",
                    "fireball",
                    "end_crystal",
                    "wither",
                    "bed",
                ]),
            )
            .category(Category::Damage)
            .blurb("Harmful explosives")
            .description("Explosives whose blasts damage the environment")
            .build()?,
        )?
        .register(
            SettingKey::poly(
                MOVEMENT.id(),
                AltSet::full(),
                StringSetCodec::new().with_options(["walk", "teleport", "portal", "vehicle"]),
            )
            .category(Category::Movement)
            .blurb("Movement types")
            .description("Ways actors may move into or within a zone")
            .player_restrictive()
            .build()?,
        )?
        .register(allow(PVP.id(), Category::Damage, "Player versus player damage")?)?
        .register(allow(ENTRY.id(), Category::Movement, "Entering the zone")?)?
        .register(allow(EXIT.id(), Category::Movement, "Leaving the zone")?)?
        .register(allow(ITEM_DROP.id(), Category::Entities, "Dropping items")?)?
        .register(allow(ITEM_PICKUP.id(), Category::Entities, "Picking up items")?)?
        .register(toggle(FIRE_SPREAD.id(), true, Category::Blocks, "Fire spread")?)?
        .register(toggle(LEAF_DECAY.id(), true, Category::Blocks, "Leaf decay")?)?
        .register(toggle(HUNGER_DRAIN.id(), true, Category::Misc, "Hunger drain")?)?
        .register(toggle(DROP_EXP.id(), true, Category::Entities, "Experience drops")?)?
        .register(
            SettingKey::unary(GREETING.id(), Datum::MaybeText(None), OptionalTextCodec)
                .category(Category::Misc)
                .blurb("Greeting message")
                .description("Message shown to an actor entering the zone")
                .build()?,
        )?
        .register(
            SettingKey::unary(FAREWELL.id(), Datum::MaybeText(None), OptionalTextCodec)
                .category(Category::Misc)
                .blurb("Farewell message")
                .description("Message shown to an actor leaving the zone")
                .build()?,
        )?
        .register(
            SettingKey::unary(HEAL_AMOUNT.id(), Datum::Int(0), IntCodec::range(0, 20))
                .category(Category::Misc)
                .blurb("Heal amount")
                .description("Health restored per heal tick")
                .build()?,
        )?
        .register(
            SettingKey::unary(HEAL_RATE.id(), Datum::Int(0), IntCodec::at_least(0))
                .category(Category::Misc)
                .blurb("Heal rate")
                .description("Seconds between heal ticks, 0 to disable")
                .build()?,
        )?
        .register(
            SettingKey::unary(WAND_ITEM.id(), Datum::Text("stick".to_string()), TextCodec)
                .category(Category::Misc)
                .blurb("Selection wand item")
                .global()
                .functional(false)
                .build()?,
        )?;
    Ok(())
}

/// A locked registry holding the standard keys.
pub fn standard() -> Result<SettingKeyRegistry, ApiError> {
    let mut builder = SettingKeyRegistry::builder();
    register_standard(&mut builder)?;
    Ok(builder.build())
}
