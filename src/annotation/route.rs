//! Route block grammar.
//!
//! The first line declares the route, every other line may carry one of the
//! route tags:
//!
//! ```text
//! @api {get} /items/:id Get one item
//! @apiName getItem
//! @apiGroup Items
//! @apiUse Paging
//! @apiConsumes application/json
//! @apiProduces application/json
//! @apiBody item #Item
//! @apiResponse 404 #Error Not found
//! @apiDescription #ItemNotes
//! @apiParam {String} id item id
//! ```

use super::cursor::{is_word, scan_tag, tag_word, Cursor};
use super::field::extract_fields;
use crate::comment::CommentBlock;
use crate::error::Result;
use crate::model::{BodyBinding, FieldMap, HttpMethod, ResponseSpec};

pub const DEFAULT_MEDIA_TYPE: &str = "application/json";

/// A route block read syntactically, before any reference is resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDraft {
    pub controller: String,
    pub method: HttpMethod,
    pub path: String,
    pub summary: String,
    /// Raw `@apiName` value
    pub name: String,
    pub group: String,
    /// `@apiUse` names, in reference order
    pub uses: Vec<String>,
    /// `@apiParam`/`@apiHeader` declared directly in the block
    pub inline_params: FieldMap,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub body: Vec<BodyBinding>,
    pub responses: Vec<ResponseSpec>,
    /// `@apiDescription` names, in reference order
    pub descriptions: Vec<String>,
}

/// `@api {method} path summary` from the first line of a block.
#[derive(Debug, PartialEq, Eq)]
struct RouteHeader<'a> {
    method: HttpMethod,
    path: &'a str,
    summary: &'a str,
}

/// Read a route candidate block.
///
/// Returns `Ok(None)` when the first line is not a route declaration or
/// names an unknown HTTP method.
pub fn parse_route(block: &CommentBlock) -> Result<Option<RouteDraft>> {
    let Some(header) = scan_tag(block.first_line(), "@api", route_header) else {
        return Ok(None);
    };
    let lines = block.body();

    let first_word = |tag: &str| {
        lines
            .iter()
            .find_map(|line| tag_word(line, tag))
            .unwrap_or("")
            .to_string()
    };
    let every_word = |tag: &str| -> Vec<String> {
        lines
            .iter()
            .filter_map(|line| tag_word(line, tag))
            .map(str::to_string)
            .collect()
    };

    Ok(Some(RouteDraft {
        controller: block.source.clone(),
        method: header.method,
        path: header.path.to_string(),
        summary: header.summary.to_string(),
        name: first_word("@apiName"),
        group: first_word("@apiGroup"),
        uses: every_word("@apiUse"),
        inline_params: extract_fields(lines).map_err(|e| e.in_file(&block.source))?,
        consumes: media_types(lines, "@apiConsumes"),
        produces: media_types(lines, "@apiProduces"),
        body: lines.iter().filter_map(|line| body_binding(line)).collect(),
        responses: lines.iter().filter_map(|line| response(line)).collect(),
        descriptions: lines
            .iter()
            .filter_map(|line| scan_tag(line, "@apiDescription", model_name))
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
    }))
}

fn route_header<'a>(cursor: &mut Cursor<'a>) -> Option<RouteHeader<'a>> {
    if !cursor.eat('{') {
        return None;
    }
    let method = cursor.take_while1(is_word)?;
    if !cursor.eat('}') || !cursor.skip_ws1() {
        return None;
    }
    let path = cursor.take_while1(|c| is_word(c) || matches!(c, '/' | ':' | '-'))?;
    if !cursor.skip_ws1() {
        return None;
    }
    // words and spaces, ending on a word character
    let summary = cursor
        .take_while(|c| is_word(c) || c.is_whitespace())
        .trim_end();
    if summary.len() < 2 {
        return None;
    }

    Some(RouteHeader {
        method: HttpMethod::parse(method)?,
        path,
        summary,
    })
}

/// `@apiConsumes`/`@apiProduces` values, falling back to `application/json`.
fn media_types(lines: &[String], tag: &str) -> Vec<String> {
    let found: Vec<String> = lines
        .iter()
        .filter_map(|line| {
            scan_tag(line, tag, |c| {
                c.take_while1(|ch| is_word(ch) || matches!(ch, '/' | '-' | '+' | '.'))
            })
        })
        .map(str::to_string)
        .collect();

    if found.is_empty() {
        vec![DEFAULT_MEDIA_TYPE.to_string()]
    } else {
        found
    }
}

/// A model name written as `#Name`; the `#` is optional.
fn model_name<'a>(cursor: &mut Cursor<'a>) -> Option<&'a str> {
    cursor.eat('#');
    Some(cursor.take_while(is_word))
}

fn body_binding(line: &str) -> Option<BodyBinding> {
    scan_tag(line, "@apiBody", |c| {
        let name = c.take_while1(is_word)?;
        if !c.eat_ws() {
            return None;
        }
        let model = model_name(c).filter(|m| !m.is_empty())?;
        Some(BodyBinding {
            name: name.to_string(),
            model: model.to_string(),
        })
    })
}

fn response(line: &str) -> Option<ResponseSpec> {
    scan_tag(line, "@apiResponse", |c| {
        let code = c.take_while1(is_word)?;
        if !c.eat_ws() {
            return None;
        }
        let model = model_name(c).filter(|m| !m.is_empty())?;
        c.skip_ws();
        Some(ResponseSpec {
            code: code.to_string(),
            model: model.to_string(),
            description: c.rest().trim_end().to_string(),
        })
    })
}
