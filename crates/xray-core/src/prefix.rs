//! Line prefixes for the rendered tree.
//!
//! Every rendered line starts with a non-breaking space so that log viewers
//! which strip leading ASCII whitespace keep the indentation intact. The
//! columns after it are driven by a [`LastChildMask`]: bit `d` is set when the
//! node at depth `d + 1` on the current path is the last child of its parent.

/// Leading marker written at the start of every line.
pub const LINE_MARKER: char = '\u{a0}';

const WORD_BITS: usize = u64::BITS as usize;

/// Characters used to draw tree branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    /// Opens every line.
    pub marker: char,
    /// Continuation column under a non-last ancestor.
    pub vertical: char,
    /// Branch into a child that has following siblings.
    pub branch: char,
    /// Branch into the last child.
    pub last_branch: char,
    /// Horizontal stroke between the branch and the description.
    pub horizontal: char,
}

impl Glyphs {
    /// Box-drawing glyphs: `├─`, `╰─` and `│`.
    pub const UNICODE: Glyphs = Glyphs {
        marker: LINE_MARKER,
        vertical: '│',
        branch: '├',
        last_branch: '╰',
        horizontal: '─',
    };

    /// Plain ASCII glyphs: `+-`, `` `- `` and `|`.
    pub const ASCII: Glyphs = Glyphs {
        marker: LINE_MARKER,
        vertical: '|',
        branch: '+',
        last_branch: '`',
        horizontal: '-',
    };
}

impl Default for Glyphs {
    fn default() -> Self {
        Self::UNICODE
    }
}

/// Growable bitset recording, per depth, whether the node on the current
/// path is the last child of its parent.
///
/// Unset or never-touched depths read as `false`, so the mask has no depth
/// limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastChildMask {
    words: Vec<u64>,
}

impl LastChildMask {
    /// Create an empty mask.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the bit for `depth`.
    pub fn get(&self, depth: usize) -> bool {
        let (word, bit) = (depth / WORD_BITS, depth % WORD_BITS);
        self.words
            .get(word)
            .is_some_and(|bits| bits & (1u64 << bit) != 0)
    }

    /// Set or clear the bit for `depth`, growing the mask as needed.
    pub fn set(&mut self, depth: usize, is_last: bool) {
        let (word, bit) = (depth / WORD_BITS, depth % WORD_BITS);
        if is_last {
            if self.words.len() <= word {
                self.words.resize(word + 1, 0);
            }
            self.words[word] |= 1u64 << bit;
        } else if let Some(bits) = self.words.get_mut(word) {
            *bits &= !(1u64 << bit);
        }
    }
}

/// Append the prefix for a line of a node rendered at `depth`.
///
/// `continuation` is true for the second and following lines of a multi-line
/// description; those lines keep the ancestor columns but draw a plain
/// continuation column where the first line has its branch glyph.
pub fn append_line_prefix(
    out: &mut String,
    depth: usize,
    continuation: bool,
    mask: &LastChildMask,
    glyphs: &Glyphs,
) {
    out.push(glyphs.marker);
    for parent_depth in 0..depth {
        if parent_depth > 0 {
            out.push(' ');
        }
        let branch_column = parent_depth + 1 == depth && !continuation;
        let glyph = match (mask.get(parent_depth), branch_column) {
            (true, true) => glyphs.last_branch,
            (true, false) => ' ',
            (false, true) => glyphs.branch,
            (false, false) => glyphs.vertical,
        };
        out.push(glyph);
    }
    if depth > 0 {
        out.push(if continuation { ' ' } else { glyphs.horizontal });
    }
}
