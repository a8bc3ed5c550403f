//! Minimal TrueType font for text rendering tests.
//!
//! 1000 units per em, ascender 800, descender -200. Printable ASCII
//! (`!` to `~`) maps to a single glyph: a filled square from (50, 0) to
//! (550, 700) with a 600 unit advance. Everything else, including space,
//! maps to an empty `.notdef` with a 500 unit advance.
//!
//! At pixel size `s` one font unit is `s / 1000` pixels.

fn push_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn push_i16(buf: &mut Vec<u8>, value: i16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn head() -> Vec<u8> {
    let mut t = Vec::new();
    push_u32(&mut t, 0x0001_0000); // version
    push_u32(&mut t, 0x0001_0000); // font revision
    push_u32(&mut t, 0); // checksum adjustment
    push_u32(&mut t, 0x5F0F_3CF5); // magic
    push_u16(&mut t, 0); // flags
    push_u16(&mut t, 1000); // units per em
    t.extend_from_slice(&[0u8; 16]); // created, modified
    push_i16(&mut t, 0); // x min
    push_i16(&mut t, -200); // y min
    push_i16(&mut t, 600); // x max
    push_i16(&mut t, 800); // y max
    push_u16(&mut t, 0); // mac style
    push_u16(&mut t, 8); // lowest rec ppem
    push_i16(&mut t, 2); // font direction hint
    push_i16(&mut t, 0); // short loca offsets
    push_i16(&mut t, 0); // glyph data format
    t
}

fn hhea() -> Vec<u8> {
    let mut t = Vec::new();
    push_u32(&mut t, 0x0001_0000);
    push_i16(&mut t, 800); // ascender
    push_i16(&mut t, -200); // descender
    push_i16(&mut t, 0); // line gap
    push_u16(&mut t, 600); // advance width max
    push_i16(&mut t, 0); // min left side bearing
    push_i16(&mut t, 0); // min right side bearing
    push_i16(&mut t, 550); // x max extent
    push_i16(&mut t, 1); // caret slope rise
    push_i16(&mut t, 0); // caret slope run
    push_i16(&mut t, 0); // caret offset
    t.extend_from_slice(&[0u8; 8]); // reserved
    push_i16(&mut t, 0); // metric data format
    push_u16(&mut t, 2); // number of h metrics
    t
}

fn maxp() -> Vec<u8> {
    let mut t = Vec::new();
    push_u32(&mut t, 0x0000_5000);
    push_u16(&mut t, 2); // glyphs
    t
}

fn hmtx() -> Vec<u8> {
    let mut t = Vec::new();
    push_u16(&mut t, 500);
    push_i16(&mut t, 0);
    push_u16(&mut t, 600);
    push_i16(&mut t, 50);
    t
}

fn cmap() -> Vec<u8> {
    let chars: Vec<u32> = (0x21..=0x7E).collect();
    let mut t = Vec::new();
    push_u16(&mut t, 0); // version
    push_u16(&mut t, 1); // tables
    push_u16(&mut t, 3); // windows
    push_u16(&mut t, 10); // unicode full repertoire
    push_u32(&mut t, 12); // subtable offset

    // Format 12, one group per character so every group starts at glyph 1
    push_u16(&mut t, 12);
    push_u16(&mut t, 0);
    push_u32(&mut t, 16 + 12 * chars.len() as u32);
    push_u32(&mut t, 0); // language
    push_u32(&mut t, chars.len() as u32);
    for c in chars {
        push_u32(&mut t, c);
        push_u32(&mut t, c);
        push_u32(&mut t, 1);
    }
    t
}

/// Square glyph as a simple TrueType outline (34 bytes).
fn square_glyph() -> Vec<u8> {
    let mut g = Vec::new();
    push_i16(&mut g, 1); // contours
    push_i16(&mut g, 50);
    push_i16(&mut g, 0);
    push_i16(&mut g, 550);
    push_i16(&mut g, 700);
    push_u16(&mut g, 3); // last point of contour 0
    push_u16(&mut g, 0); // no instructions
    g.extend_from_slice(&[0x01; 4]); // on curve, 16-bit deltas
    for dx in [50, 500, 0, -500] {
        push_i16(&mut g, dx);
    }
    for dy in [0, 0, 700, 0] {
        push_i16(&mut g, dy);
    }
    g
}

fn loca(glyph_len: usize) -> Vec<u8> {
    let mut t = Vec::new();
    push_u16(&mut t, 0);
    push_u16(&mut t, 0);
    push_u16(&mut t, (glyph_len / 2) as u16);
    t
}

/// Complete font file.
pub fn square_font() -> Vec<u8> {
    let glyf = square_glyph();
    // Sorted by tag
    let tables: Vec<(&[u8; 4], Vec<u8>)> = vec![
        (b"cmap", cmap()),
        (b"glyf", glyf.clone()),
        (b"head", head()),
        (b"hhea", hhea()),
        (b"hmtx", hmtx()),
        (b"loca", loca(glyf.len())),
        (b"maxp", maxp()),
    ];

    let mut font = Vec::new();
    push_u32(&mut font, 0x0001_0000);
    push_u16(&mut font, tables.len() as u16);
    push_u16(&mut font, 64); // search range
    push_u16(&mut font, 2); // entry selector
    push_u16(&mut font, tables.len() as u16 * 16 - 64); // range shift

    let mut offset = 12 + 16 * tables.len();
    let mut body = Vec::new();
    for (tag, data) in &tables {
        font.extend_from_slice(*tag);
        push_u32(&mut font, 0); // checksum
        push_u32(&mut font, offset as u32);
        push_u32(&mut font, data.len() as u32);

        body.extend_from_slice(data);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        offset = 12 + 16 * tables.len() + body.len();
    }
    font.extend_from_slice(&body);
    font
}
