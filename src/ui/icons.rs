pub struct Icons;

impl Icons {
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const DATABASE: &str = "🗄️";
    pub const PERSON: &str = "👤";
    pub const BUILDING: &str = "🏢";
    pub const ROOM: &str = "🎥";
    pub const PACKAGE: &str = "📦";
    pub const MOVE: &str = "🔀";
    pub const WAREHOUSE: &str = "🏚️";
    pub const CLIPBOARD: &str = "📋";
    pub const LOG: &str = "📜";
    pub const TAG: &str = "🏷️";
    pub const UNREAD: &str = "🔴";
    pub const READ: &str = "⚪";
    pub const EMPTY: &str = "∅";
}
