//! Front matter: title variables, preamble, cover, approvals, change
//! history, distribution list and outlines.

use std::fmt::Write;

use chrono::NaiveDate;

use super::markup::string_literal;
use super::RenderOptions;
use crate::model::{DocumentDetails, SubsystemDetails};

const QUALITY_POLICY: &str = "URSC Quality Policy: Committed to total quality and Zero defect \
in Space Systems and Services through Continual Improvement";

/// `#let` bindings referenced throughout the document.
pub fn title_variables(
    details: &DocumentDetails,
    subsystem: &SubsystemDetails,
    date: NaiveDate,
) -> String {
    let title = subsystem.document_title();
    let today = date.format("%d-%b-%Y").to_string();
    let month = date.format("%b %Y").to_string();
    let groups: [Vec<(&str, &str)>; 4] = [
        vec![
            ("docNum", details.document_number.as_str()),
            ("docTitle", title.as_str()),
            ("today", today.as_str()),
            ("month", month.as_str()),
        ],
        vec![
            ("ssName", subsystem.subsystem_name.as_str()),
            ("satName", subsystem.satellite_name.as_str()),
        ],
        vec![
            ("preparedBy", details.prepared_by.as_str()),
            ("reviewerName", details.reviewed_by_name.as_str()),
            ("reviewerTitle", details.reviewed_by_title.as_str()),
        ],
        vec![
            ("app1Name", details.first_approver_name.as_str()),
            ("app1Title", details.first_approver_title.as_str()),
            ("app2Name", details.second_approver_name.as_str()),
            ("app2Title", details.second_approver_title.as_str()),
        ],
    ];

    let mut out = String::new();
    for group in groups {
        for (name, value) in group {
            let _ = writeln!(out, "#let {} = \"{}\"", name, string_literal(value));
        }
        out.push('\n');
    }
    out
}

/// Global settings shared by the document and the signature page.
fn base_settings(options: &RenderOptions) -> String {
    format!(
        "#import \"{}\"\n\
         #set heading(numbering: \"1.1\", supplement:[Chapter])\n\
         #set par(justify: true,leading:1.15em)\n\
         #set block(spacing:1.5em)\n\
         #set list(indent: 10pt)\n\
         #set text(font: \"Roboto\")\n",
        options.markdown_package
    )
}

/// Full preamble: page setup with the running header and footer, and the
/// `appendix` show rule used by the annexure chapters.
pub fn preamble(options: &RenderOptions) -> String {
    let mut out = base_settings(options);
    out.push_str(
        "#set page(\n\
         \x20 margin: (top: 4cm, x: 1.5cm, bottom: 2cm),\n\
         \x20 header: table(\n\
         \x20   columns: (10fr, 40fr, 20fr, 30fr),\n\
         \x20   rows: 3,\n\
         \x20   table.cell(rowspan: 3, image(\"images/logo.png\")),\n\
         \x20   table.cell(rowspan: 2, align: center, [#docNum]),\n\
         \x20   [Issue: A],\n\
         \x20   [Page #context(counter(page).display(\"1 of 1\", both: true))],\n\
         \x20   [Revision: 0],\n\
         \x20   [Issue Date: #today],\n\
         \x20   table.cell(colspan: 3, align: center, [#docTitle]),\n\
         \x20 ),\n",
    );
    let _ = writeln!(
        out,
        "  footer: context[#h(1fr) #text(8pt)[{}] #h(1fr)],\n)",
        QUALITY_POLICY
    );
    out.push_str(
        "#let appendix(body) = {\n\
         \x20 set heading(numbering: \"A\", supplement: [Appendix], outlined: true, bookmarked: true)\n\
         \x20 counter(heading).update(0)\n\
         \x20 body\n\
         }\n\n",
    );
    out
}

fn reduced_preamble(options: &RenderOptions) -> String {
    let mut out = base_settings(options);
    out.push_str("#set page(margin: (top: 4cm, x: 1.5cm, bottom: 2cm))\n");
    out
}

fn title_block() -> &'static str {
    "#align(center)[\n\
     \x20 #text(18pt)[\n\
     \x20   #satName #linebreak()\n\
     \x20   Integrated Spacecraft Test Document #linebreak()\n\
     \x20   of #linebreak()\n\
     \x20   #ssName #linebreak()\n\
     \x20 ]\n\
     ]\n"
}

/// Cover page with the satellite picture.
fn cover_page() -> String {
    let mut out = String::from("#linebreak()\n");
    out.push_str(title_block());
    out.push_str("#v(1fr)\n#align(center, image(\"images/scImage.png\"))\n#v(1fr)\n");
    out.push_str("#pagebreak()\n#linebreak()\n");
    out
}

/// Generated approval page with blank space for signatures.
pub fn signature_block() -> String {
    let mut out = String::from(title_block());
    out.push_str(
        "#v(1fr)\n\
         #align(center)[\n\
         \x20 Prepared By, #linebreak()\n\
         \x20 #preparedBy\n\
         ]\n\
         #v(1fr)\n\
         #align(center)[\n\
         \x20 Reviewed By, #linebreak()\n\
         \x20 #linebreak()\n\
         \x20 #linebreak()\n\
         \x20 #reviewerName #linebreak()\n\
         \x20 #reviewerTitle\n\
         ]\n\
         #v(1fr)\n\
         #align(center)[Approved By,]\n\
         #linebreak()\n\
         #linebreak()\n\
         #grid(\n\
         \x20 columns: (1fr, 1fr),\n\
         \x20 grid.cell(align: center)[#app1Name , #linebreak() #app1Title],\n\
         \x20 grid.cell(align: center)[#app2Name , #linebreak() #app2Title],\n\
         )\n\
         #v(1fr)\n\
         #align(center)[#month]\n\
         #v(1fr)\n\
         #align(center)[\n\
         \x20 U R Rao Satellite Center #linebreak()\n\
         \x20 Indian Space Research Organization #linebreak()\n\
         \x20 Bangalore\n\
         ]\n",
    );
    out
}

/// Scanned approval page stored after signing.
fn signed_page(image: &str) -> String {
    format!(
        "#v(1fr)\n#align(center, image(\"{}\"))\n#v(1fr)\n",
        string_literal(image)
    )
}

fn change_history() -> &'static str {
    "#pagebreak()\n\
     #linebreak()\n\
     #text(size:18pt)[*Change History*]\n\
     #table(\n\
     \x20 align: center,\n\
     \x20 columns: (1fr, 2fr, 2fr, 2fr, 2fr),\n\
     \x20 rows: 10,\n\
     \x20 [*Version No*], [*Date*], [*Affected Section, Figure, Table*], [*Nature of Change[A, M, D]\\**], [*Description*],\n\
     \x20 [1.0], [#month], [New], [New], [Initial Issue],\n\
     )\n\
     $*$ A - Addition, D - Deletion, M - Modification\n"
}

fn distribution_list() -> &'static str {
    "#pagebreak()\n\
     #linebreak()\n\
     #text(size:18pt)[*Document Distribution List*]\n\
     #table(\n\
     \x20 align: center,\n\
     \x20 columns: (1fr, 2fr, 2fr),\n\
     \x20 rows: 10,\n\
     \x20 [*Copy No*], [*Issued to*], [*Remarks*],\n\
     \x20 [1], [ISO Record], [Softcopy],\n\
     \x20 [2], [Master Copy Originator (Uncontrolled)], [Softcopy],\n\
     \x20 [3], [Committee Members], [Softcopy],\n\
     )\n"
}

fn outlines() -> &'static str {
    "#pagebreak()\n\
     #outline(target: heading.where(supplement: [Chapter]), title: [Table of Contents], indent: auto, depth: 3)\n\
     #outline(target: heading.where(supplement: [Appendix]), title: [Annexure], indent: auto)\n\
     #pagebreak()\n\
     #outline(title: [List of Figures], target: figure.where(kind: image))\n\
     #outline(title: [List of Tables], target: figure.where(kind: table))\n\
     #pagebreak()\n"
}

/// Everything before the first chapter.
///
/// `signed_image` is the session-relative path of a scanned approval page;
/// without one the generated signature page is used.
pub fn front_matter(
    details: &DocumentDetails,
    subsystem: &SubsystemDetails,
    signed_image: Option<&str>,
    options: &RenderOptions,
) -> String {
    let mut out = title_variables(details, subsystem, options.issue_date());
    out.push_str(&preamble(options));
    out.push_str(&cover_page());
    match signed_image {
        Some(image) => out.push_str(&signed_page(image)),
        None => out.push_str(&signature_block()),
    }
    out.push_str(change_history());
    out.push_str(distribution_list());
    out.push_str(outlines());
    out
}

/// Standalone approval page for wet-ink signing.
pub fn signature_page(
    details: &DocumentDetails,
    subsystem: &SubsystemDetails,
    options: &RenderOptions,
) -> String {
    let mut out = title_variables(details, subsystem, options.issue_date());
    out.push_str(&reduced_preamble(options));
    out.push_str("#linebreak()\n");
    out.push_str(&signature_block());
    out
}
