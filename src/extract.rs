use select::document::Document;
use select::node::Node;

/// Elements whose subtrees never contribute visible text.
const SKIPPED_ELEMENTS: [&str; 2] = ["script", "style"];

/// Phrasing elements that sit inside a word without breaking it, as in `<b>bo</b>ld`.
/// Every other element starts and ends a word.
const INLINE_ELEMENTS: [&str; 25] = [
    "a", "abbr", "b", "bdi", "bdo", "cite", "code", "data", "dfn", "em", "font", "i", "kbd",
    "mark", "q", "s", "samp", "small", "span", "strong", "sub", "sup", "time", "u", "var",
];

/// Everything a single walk over a document produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContent {
    /// Visible text with every run of whitespace collapsed to one space.
    pub text: String,
    pub link_count: usize,
    pub image_count: usize,
}

impl PageContent {
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Parses `html` and collects text, anchors and images in one pass.
pub fn extract(html: &str) -> PageContent {
    let document = Document::from(html);
    extract_document(&document)
}

enum Step<'a> {
    Enter(Node<'a>),
    Break,
}

fn extract_document(document: &Document) -> PageContent {
    let mut walker = Walker::default();

    // Top-level nodes in document order, reversed so they pop in order.
    let mut stack: Vec<Step> = (0..document.nodes.len())
        .filter_map(|index| document.nth(index))
        .filter(|node| node.parent().is_none())
        .map(Step::Enter)
        .collect();
    stack.reverse();

    while let Some(step) = stack.pop() {
        let node = match step {
            Step::Enter(node) => node,
            Step::Break => {
                walker.text.push(' ');
                continue;
            }
        };

        match walker.visit(&node) {
            Descend::No => {}
            Descend::Inline => push_children(&mut stack, &node),
            Descend::Block => {
                walker.text.push(' ');
                stack.push(Step::Break);
                push_children(&mut stack, &node);
            }
        }
    }

    walker.finish()
}

fn push_children<'a>(stack: &mut Vec<Step<'a>>, node: &Node<'a>) {
    let mut children: Vec<Step> = node.children().map(Step::Enter).collect();
    children.reverse();
    stack.extend(children);
}

enum Descend {
    No,
    Inline,
    Block,
}

#[derive(Default)]
struct Walker {
    text: String,
    links: usize,
    images: usize,
}

impl Walker {
    /// Tallies `node` and decides how its children are walked.
    fn visit(&mut self, node: &Node) -> Descend {
        if let Some(text) = node.as_text() {
            self.text.push_str(text);
            return Descend::No;
        }

        match node.name() {
            Some("a") => self.links += 1,
            Some("img") => self.images += 1,
            Some(name) if SKIPPED_ELEMENTS.contains(&name) => return Descend::No,
            Some(_) => {}
            // Comments
            None => return Descend::No,
        }

        match node.name() {
            Some(name) if INLINE_ELEMENTS.contains(&name) => Descend::Inline,
            _ => Descend::Block,
        }
    }

    fn finish(self) -> PageContent {
        PageContent {
            text: collapse_whitespace(&self.text),
            link_count: self.links,
            image_count: self.images,
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
