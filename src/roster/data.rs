//! Fighter roster data: names, accent colors, community aliases.

/// One selectable fighter as shipped in the static roster.
#[derive(Debug, Clone, Copy)]
pub struct FighterData {
    /// Unique display name.
    pub name: &'static str,
    /// RGB accent color used when this fighter leads the match display.
    pub color: u32,
    /// Alternate names accepted by fuzzy resolution.
    pub aliases: &'static [&'static str],
}

/// The full selectable cast.
pub const FIGHTERS: &[FighterData] = &[
    FighterData { name: "Mario", color: 0xE70012, aliases: &[] },
    FighterData { name: "Donkey Kong", color: 0x8B4513, aliases: &["dk"] },
    FighterData { name: "Link", color: 0x2E8B57, aliases: &[] },
    FighterData { name: "Samus", color: 0xF05A28, aliases: &[] },
    FighterData { name: "Dark Samus", color: 0x5C4E8E, aliases: &["dsamus"] },
    FighterData { name: "Yoshi", color: 0x6ABE30, aliases: &[] },
    FighterData { name: "Kirby", color: 0xFF9EB5, aliases: &[] },
    FighterData { name: "Fox", color: 0xD2691E, aliases: &[] },
    FighterData { name: "Pikachu", color: 0xF5D000, aliases: &["pika"] },
    FighterData { name: "Luigi", color: 0x00A651, aliases: &[] },
    FighterData { name: "Ness", color: 0xC81A34, aliases: &[] },
    FighterData { name: "Captain Falcon", color: 0x1E3F9E, aliases: &["falcon"] },
    FighterData { name: "Jigglypuff", color: 0xFFB6C1, aliases: &["puff", "jiggly"] },
    FighterData { name: "Peach", color: 0xF89FC1, aliases: &[] },
    FighterData { name: "Daisy", color: 0xFFA500, aliases: &[] },
    FighterData { name: "Bowser", color: 0x97B932, aliases: &[] },
    FighterData { name: "Ice Climbers", color: 0x00BFFF, aliases: &["icies", "ics"] },
    FighterData { name: "Sheik", color: 0x4B0082, aliases: &[] },
    FighterData { name: "Zelda", color: 0xD8BFD8, aliases: &[] },
    FighterData { name: "Dr. Mario", color: 0xEDEDED, aliases: &["doc"] },
    FighterData { name: "Pichu", color: 0xFFEE77, aliases: &[] },
    FighterData { name: "Falco", color: 0x2B4BBE, aliases: &[] },
    FighterData { name: "Marth", color: 0x1C3578, aliases: &[] },
    FighterData { name: "Lucina", color: 0x274E8D, aliases: &[] },
    FighterData { name: "Young Link", color: 0x3CB371, aliases: &["yink"] },
    FighterData { name: "Ganondorf", color: 0x5C4033, aliases: &["ganon"] },
    FighterData { name: "Mewtwo", color: 0xA47CC4, aliases: &[] },
    FighterData { name: "Roy", color: 0xB22222, aliases: &[] },
    FighterData { name: "Chrom", color: 0x3A4E7A, aliases: &[] },
    FighterData { name: "Mr. Game & Watch", color: 0x111111, aliases: &["game and watch", "gnw"] },
    FighterData { name: "Meta Knight", color: 0x483D8B, aliases: &["mk"] },
    FighterData { name: "Pit", color: 0xF5F5F5, aliases: &[] },
    FighterData { name: "Dark Pit", color: 0x36454F, aliases: &["pittoo"] },
    FighterData { name: "Zero Suit Samus", color: 0x00CED1, aliases: &["zss"] },
    FighterData { name: "Wario", color: 0xFFDE00, aliases: &[] },
    FighterData { name: "Snake", color: 0x556B2F, aliases: &[] },
    FighterData { name: "Ike", color: 0x27408B, aliases: &[] },
    FighterData { name: "Pokemon Trainer", color: 0xDC143C, aliases: &["pt", "trainer"] },
    FighterData { name: "Diddy Kong", color: 0xA0522D, aliases: &["diddy"] },
    FighterData { name: "Lucas", color: 0xF4A460, aliases: &[] },
    FighterData { name: "Sonic", color: 0x0000CD, aliases: &[] },
    FighterData { name: "King Dedede", color: 0xD21034, aliases: &["dedede", "ddd"] },
    FighterData { name: "Olimar", color: 0xB8860B, aliases: &["alph"] },
    FighterData { name: "Lucario", color: 0x2E5A88, aliases: &[] },
    FighterData { name: "R.O.B.", color: 0x9AA0A6, aliases: &["rob"] },
    FighterData { name: "Toon Link", color: 0x76C043, aliases: &["tink"] },
    FighterData { name: "Wolf", color: 0x696969, aliases: &[] },
    FighterData { name: "Villager", color: 0x8FBC8F, aliases: &[] },
    FighterData { name: "Mega Man", color: 0x0F9BD7, aliases: &["megaman"] },
    FighterData { name: "Wii Fit Trainer", color: 0x00FA9A, aliases: &["wft", "wii fit"] },
    FighterData { name: "Rosalina & Luma", color: 0x40E0D0, aliases: &["rosalina", "rosa"] },
    FighterData { name: "Little Mac", color: 0x2F4F4F, aliases: &["mac"] },
    FighterData { name: "Greninja", color: 0x1F3A5F, aliases: &[] },
    FighterData { name: "Mii Brawler", color: 0x8A8A8A, aliases: &["brawler"] },
    FighterData { name: "Mii Swordfighter", color: 0x708090, aliases: &["swordfighter"] },
    FighterData { name: "Mii Gunner", color: 0x778899, aliases: &["gunner"] },
    FighterData { name: "Palutena", color: 0x98FB98, aliases: &["palu"] },
    FighterData { name: "Pac-Man", color: 0xFFD700, aliases: &["pacman", "pac"] },
    FighterData { name: "Robin", color: 0x6F4E7C, aliases: &[] },
    FighterData { name: "Shulk", color: 0xC0392B, aliases: &[] },
    FighterData { name: "Bowser Jr.", color: 0x7CB342, aliases: &["jr"] },
    FighterData { name: "Duck Hunt", color: 0x8B7355, aliases: &["dog"] },
    FighterData { name: "Ryu", color: 0xCFCFC4, aliases: &[] },
    FighterData { name: "Ken", color: 0xFF4500, aliases: &[] },
    FighterData { name: "Cloud", color: 0x4682B4, aliases: &[] },
    FighterData { name: "Corrin", color: 0x9FB4CC, aliases: &[] },
    FighterData { name: "Bayonetta", color: 0x2C2C54, aliases: &["bayo"] },
    FighterData { name: "Inkling", color: 0xE4007F, aliases: &[] },
    FighterData { name: "Ridley", color: 0x5D3A9B, aliases: &[] },
    FighterData { name: "Simon", color: 0x8B6914, aliases: &["belmont"] },
    FighterData { name: "Richter", color: 0x4A6FA5, aliases: &[] },
    FighterData { name: "King K. Rool", color: 0x3B7A57, aliases: &["krool"] },
    FighterData { name: "Isabelle", color: 0xFFEC8B, aliases: &[] },
    FighterData { name: "Incineroar", color: 0xCC3333, aliases: &[] },
    FighterData { name: "Piranha Plant", color: 0x3E8E41, aliases: &["plant"] },
    FighterData { name: "Joker", color: 0xC8102E, aliases: &[] },
    FighterData { name: "Hero", color: 0x5B92E5, aliases: &[] },
    FighterData { name: "Banjo & Kazooie", color: 0xC8743E, aliases: &["banjo"] },
    FighterData { name: "Terry", color: 0xC41E3A, aliases: &["bogard"] },
    FighterData { name: "Byleth", color: 0x4F6D8A, aliases: &[] },
    FighterData { name: "Min Min", color: 0xF9A825, aliases: &["minmin"] },
    FighterData { name: "Steve", color: 0x7F5A3C, aliases: &["alex"] },
    FighterData { name: "Sephiroth", color: 0x9FA8DA, aliases: &["seph"] },
    FighterData { name: "Pyra & Mythra", color: 0xE25822, aliases: &["aegis", "pyra", "mythra"] },
    FighterData { name: "Kazuya", color: 0x2F2F2F, aliases: &[] },
    FighterData { name: "Sora", color: 0xA7C7E7, aliases: &[] },
];
