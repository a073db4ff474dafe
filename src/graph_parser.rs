use winnow::prelude::*;
use winnow::ascii::{dec_int, line_ending, space0, space1, till_line_ending};
use winnow::combinator::{alt, eof, opt, repeat};
use winnow::token::take_while;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::graph::{Graph, Node};

/// Parse the plain-text graph form:
///
/// ```text
/// dag 3x2
/// # comment
/// a "Fetch" @0,0 -> b c
/// b @1,0 -> c
/// c @2,1
/// ```
pub fn parse_dag(input: &str) -> Result<Graph> {
    let mut rest = input;
    let parsed = dag(&mut rest);
    let syntax_error = |rest: &str| {
        let context = rest.lines().next().unwrap_or("").trim();
        let context_display = if context.chars().count() > 40 {
            format!("{}...", context.chars().take(40).collect::<String>())
        } else {
            context.to_string()
        };
        Error::Syntax {
            message: format!("unexpected `{context_display}`"),
        }
    };

    let decls = match parsed {
        Ok(decls) if rest.trim().is_empty() => decls,
        _ => return Err(syntax_error(rest)),
    };
    collect(decls)
}

#[derive(Debug, Clone, PartialEq)]
struct NodeLine {
    name: String,
    label: Option<String>,
    pos: Option<(i64, i64)>,
    targets: Vec<String>,
}

struct Decls {
    width: i64,
    height: i64,
    lines: Vec<NodeLine>,
}

fn collect(decls: Decls) -> Result<Graph> {
    let mut nodes: IndexMap<String, (Option<String>, Option<(i64, i64)>, Vec<String>)> =
        IndexMap::new();
    for line in decls.lines {
        let entry = nodes.entry(line.name).or_default();
        if entry.0.is_none() {
            entry.0 = line.label;
        }
        if line.pos.is_some() {
            entry.1 = line.pos;
        }
        entry.2.extend(line.targets);
    }

    let mut graph = Graph::new(decls.width, decls.height);
    for (name, (label, pos, outgoing)) in nodes {
        let Some((x, y)) = pos else {
            return Err(Error::Syntax {
                message: format!("node `{name}` has no position"),
            });
        };
        graph.nodes.insert(
            name,
            Node {
                label,
                x,
                y,
                outgoing,
            },
        );
    }
    Ok(graph)
}

fn dag(input: &mut &str) -> winnow::Result<Decls> {
    space0.parse_next(input)?;
    "dag".parse_next(input)?;
    space1.parse_next(input)?;
    let (width, height) = size.parse_next(input)?;
    space0.parse_next(input)?;
    alt((line_ending.void(), eof.void())).parse_next(input)?;

    let lines: Vec<Option<NodeLine>> = repeat(0.., dag_line).parse_next(input)?;
    Ok(Decls {
        width,
        height,
        lines: lines.into_iter().flatten().collect(),
    })
}

fn dag_line(input: &mut &str) -> winnow::Result<Option<NodeLine>> {
    space0.parse_next(input)?;

    if input.is_empty() {
        return Err(winnow::error::ParserError::from_input(input));
    }

    alt((
        blank_line.map(|_| None),
        comment_line.map(|_| None),
        node_line.map(Some),
    ))
    .parse_next(input)
}

fn blank_line(input: &mut &str) -> winnow::Result<()> {
    line_ending.void().parse_next(input)
}

fn comment_line(input: &mut &str) -> winnow::Result<()> {
    "#".parse_next(input)?;
    till_line_ending.void().parse_next(input)?;
    alt((line_ending.void(), eof.void())).parse_next(input)
}

fn size(input: &mut &str) -> winnow::Result<(i64, i64)> {
    let w: i64 = dec_int.parse_next(input)?;
    "x".parse_next(input)?;
    let h: i64 = dec_int.parse_next(input)?;
    Ok((w, h))
}

fn identifier<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    take_while(1.., |c: char| {
        c.is_alphanumeric() || c == '_' || c == '.' || c == '/'
    })
    .parse_next(input)
}

fn quoted_label(input: &mut &str) -> winnow::Result<String> {
    "\"".parse_next(input)?;
    let text = take_while(0.., |c: char| c != '"' && c != '\n').parse_next(input)?;
    "\"".parse_next(input)?;
    Ok(text.to_string())
}

fn position(input: &mut &str) -> winnow::Result<(i64, i64)> {
    "@".parse_next(input)?;
    let x: i64 = dec_int.parse_next(input)?;
    ",".parse_next(input)?;
    let y: i64 = dec_int.parse_next(input)?;
    Ok((x, y))
}

fn targets(input: &mut &str) -> winnow::Result<Vec<String>> {
    "->".parse_next(input)?;
    let mut targets = Vec::new();
    loop {
        space0.parse_next(input)?;
        match opt(identifier).parse_next(input)? {
            Some(t) => targets.push(t.to_string()),
            None => break,
        }
    }
    Ok(targets)
}

fn node_line(input: &mut &str) -> winnow::Result<NodeLine> {
    let name = identifier.parse_next(input)?;
    space0.parse_next(input)?;
    let label = opt(quoted_label).parse_next(input)?;
    space0.parse_next(input)?;
    let pos = opt(position).parse_next(input)?;
    space0.parse_next(input)?;
    let targets = opt(targets).parse_next(input)?.unwrap_or_default();
    space0.parse_next(input)?;
    alt((line_ending.void(), eof.void())).parse_next(input)?;

    Ok(NodeLine {
        name: name.to_string(),
        label,
        pos,
        targets,
    })
}
