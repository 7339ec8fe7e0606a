//! Symbolic icon keys and their glyphs.
//!
//! Projects store only the key. Resolution happens at render time and
//! unknown keys fall back to the folder glyph; stored keys are never
//! rewritten.

pub const DEFAULT_ICON: &str = "Folder";

/// Resolves a project's icon key to something displayable.
pub trait IconRegistry {
    /// Glyph for `key`, or the fallback glyph for unknown keys.
    fn resolve(&self, key: &str) -> &str;

    fn contains(&self, key: &str) -> bool;
}

const BUILTIN: &[(&str, &str)] = &[
    ("Briefcase", "💼"),
    ("Dog", "🐕"),
    ("Palette", "🎨"),
    ("Rocket", "🚀"),
    ("Dumbbell", "🏋"),
    ("PenTool", "🖋"),
    ("Gamepad", "🎮"),
    ("Folder", "📁"),
    ("LayoutGrid", "▦"),
    ("Monitor", "🖥"),
    ("Coffee", "☕"),
    ("Music", "🎵"),
    ("Book", "📖"),
    ("Code", "⌨"),
    ("Cpu", "🔲"),
    ("Globe", "🌐"),
    ("Database", "🗄"),
    ("Server", "🖧"),
    ("Wifi", "📶"),
    ("Smartphone", "📱"),
    ("Headphones", "🎧"),
    ("Camera", "📷"),
    ("Video", "📹"),
    ("Mic", "🎤"),
    ("Speaker", "🔊"),
    ("Sun", "☀"),
    ("Moon", "🌙"),
    ("Star", "⭐"),
    ("Heart", "❤"),
    ("Smile", "🙂"),
    ("Zap", "⚡"),
    ("Archive", "🗃"),
    ("Bike", "🚲"),
    ("Car", "🚗"),
    ("Cloud", "☁"),
    ("DollarSign", "💲"),
    ("Gift", "🎁"),
    ("Home", "🏠"),
    ("Key", "🔑"),
    ("Lock", "🔒"),
    ("Mail", "✉"),
    ("MapPin", "📍"),
    ("Phone", "📞"),
    ("Printer", "🖨"),
    ("ShoppingCart", "🛒"),
    ("Tool", "🔧"),
    ("Truck", "🚚"),
    ("Umbrella", "☂"),
    ("User", "👤"),
    ("Watch", "⌚"),
];

/// The built-in fifty-key registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinIcons;

impl BuiltinIcons {
    /// All known keys, in picker order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        BUILTIN.iter().map(|(key, _)| *key)
    }

    fn lookup(key: &str) -> Option<&'static str> {
        BUILTIN.iter().find(|(k, _)| *k == key).map(|(_, glyph)| *glyph)
    }
}

impl IconRegistry for BuiltinIcons {
    fn resolve(&self, key: &str) -> &str {
        Self::lookup(key)
            .or_else(|| Self::lookup(DEFAULT_ICON))
            .unwrap_or("?")
    }

    fn contains(&self, key: &str) -> bool {
        Self::lookup(key).is_some()
    }
}
