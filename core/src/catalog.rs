use crate::board::PuzzleMode;

pub const GRID_SIZE_MIN: u32 = 2;
pub const GRID_SIZE_MAX: u32 = 8;
pub const GRID_SIZE_DEFAULT: u32 = 3;

pub const BUILTIN_IMAGE_COUNT: usize = 12;

#[derive(Clone, Copy, Debug)]
pub struct AssetEntry {
    pub name: &'static str,
    pub src: &'static str,
}

pub const UI_ASSETS: &[AssetEntry] = &[
    AssetEntry {
        name: "background",
        src: "ui/bg.png",
    },
    AssetEntry {
        name: "button",
        src: "ui/btn.png",
    },
    AssetEntry {
        name: "btnsmall",
        src: "ui/btnsmall.png",
    },
    AssetEntry {
        name: "card",
        src: "ui/btnbig.png",
    },
    AssetEntry {
        name: "jigsawThumb",
        src: "ui/jigsawThumpnail.png",
    },
    AssetEntry {
        name: "gridThumb",
        src: "ui/gridThumpnail.png",
    },
    AssetEntry {
        name: "wood",
        src: "IMG/grid/wood_1920.jpg",
    },
    AssetEntry {
        name: "textile",
        src: "IMG/grid/textile_1920.jpg",
    },
];

#[derive(Clone, Copy, Debug)]
pub struct ModeCard {
    pub mode: PuzzleMode,
    pub title: &'static str,
    pub description: &'static str,
    pub thumbnail: &'static str,
}

pub const MODE_CARDS: [ModeCard; 2] = [
    ModeCard {
        mode: PuzzleMode::Grid,
        title: "Classic Grid",
        description: "Traditional grid-based puzzle with clean rectangular pieces that snap into place.",
        thumbnail: "gridThumb",
    },
    ModeCard {
        mode: PuzzleMode::Jigsaw,
        title: "Jigsaw",
        description: "Challenging interlocking pieces with tabs and blanks that fit together precisely.",
        thumbnail: "jigsawThumb",
    },
];

pub fn builtin_image_src(index: usize) -> String {
    format!("IMG/pieces/image{}.jpg", index + 1)
}

pub fn builtin_images() -> Vec<String> {
    (0..BUILTIN_IMAGE_COUNT).map(builtin_image_src).collect()
}

pub fn asset_src(name: &str) -> Option<&'static str> {
    UI_ASSETS
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| entry.src)
}

pub fn clamp_grid_size(value: u32) -> u32 {
    value.clamp(GRID_SIZE_MIN, GRID_SIZE_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_pool_is_numbered_from_one() {
        let pool = builtin_images();
        assert_eq!(pool.len(), BUILTIN_IMAGE_COUNT);
        assert_eq!(pool[0], "IMG/pieces/image1.jpg");
        assert_eq!(pool[11], "IMG/pieces/image12.jpg");
    }

    #[test]
    fn asset_lookup_by_name() {
        assert_eq!(asset_src("wood"), Some("IMG/grid/wood_1920.jpg"));
        assert_eq!(asset_src("missing"), None);
    }
}
