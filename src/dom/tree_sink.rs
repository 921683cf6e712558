//! Feeds html5ever parser events into a [`Dom`].

use std::borrow::Cow;
use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute as ParsedAttribute, QualName, local_name, ns};

use super::arena::{Attribute, Dom, NodeData, NodeId};

/// Parse errors never abort; they are kept for the caller to report.
#[derive(Default)]
pub struct DomSink {
    dom: RefCell<Dom>,
    errors: RefCell<Vec<Cow<'static, str>>>,
}

fn convert_attrs(attrs: Vec<ParsedAttribute>) -> impl Iterator<Item = Attribute> {
    attrs.into_iter().map(|a| Attribute {
        name: a.name,
        value: a.value.to_string(),
    })
}

impl DomSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_parts(self) -> (Dom, Vec<Cow<'static, str>>) {
        (self.dom.into_inner(), self.errors.into_inner())
    }

    fn create(&self, data: NodeData) -> NodeId {
        self.dom.borrow_mut().create(data)
    }

    fn place(&self, child: NodeOrText<NodeId>, attach: impl FnOnce(&mut Dom, NodeId)) {
        let mut dom = self.dom.borrow_mut();
        let node = match child {
            NodeOrText::AppendNode(node) => node,
            NodeOrText::AppendText(text) => dom.create(NodeData::Text(text.to_string())),
        };
        attach(&mut dom, node);
    }
}

impl TreeSink for DomSink {
    type Handle = NodeId;
    type Output = Self;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Self {
        self
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        self.errors.borrow_mut().push(msg);
    }

    fn get_document(&self) -> NodeId {
        self.dom.borrow().document()
    }

    fn elem_name<'a>(&'a self, target: &'a NodeId) -> &'a QualName {
        static UNNAMED: QualName = QualName {
            prefix: None,
            ns: ns!(),
            local: local_name!(""),
        };

        let dom = self.dom.borrow();
        let Some(NodeData::Element { name, .. }) = dom.get(*target).map(|n| &n.data) else {
            return &UNNAMED;
        };
        // SAFETY: the reference points into the arena's node storage, which a
        // later `Dom::create` may reallocate. html5ever only compares the name
        // before it asks the sink for another node, and names are never
        // mutated in place.
        unsafe { &*(name as *const QualName) }
    }

    fn create_element(&self, name: QualName, attrs: Vec<ParsedAttribute>, _: ElementFlags) -> NodeId {
        self.create(NodeData::Element {
            name,
            attrs: convert_attrs(attrs).collect(),
        })
    }

    fn create_comment(&self, text: StrTendril) -> NodeId {
        self.create(NodeData::Comment(text.to_string()))
    }

    // Processing instructions have no meaning in section HTML.
    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> NodeId {
        self.create(NodeData::Comment(String::new()))
    }

    fn append(&self, parent: &NodeId, child: NodeOrText<NodeId>) {
        if let NodeOrText::AppendText(text) = &child {
            self.dom.borrow_mut().append_text(*parent, text);
            return;
        }
        self.place(child, |dom, node| dom.append(*parent, node));
    }

    fn append_based_on_parent_node(
        &self,
        element: &NodeId,
        prev_element: &NodeId,
        child: NodeOrText<NodeId>,
    ) {
        let has_parent = self.dom.borrow().parent(*element).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(&self, _: StrTendril, _: StrTendril, _: StrTendril) {
        let doctype = self.create(NodeData::Doctype);
        let mut dom = self.dom.borrow_mut();
        let document = dom.document();
        dom.append(document, doctype);
    }

    fn get_template_contents(&self, target: &NodeId) -> NodeId {
        *target
    }

    fn same_node(&self, x: &NodeId, y: &NodeId) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &NodeId, new_node: NodeOrText<NodeId>) {
        self.place(new_node, |dom, node| dom.insert_before(*sibling, node));
    }

    fn add_attrs_if_missing(&self, target: &NodeId, attrs: Vec<ParsedAttribute>) {
        let mut dom = self.dom.borrow_mut();
        let Some(NodeData::Element { attrs: existing, .. }) =
            dom.get_mut(*target).map(|n| &mut n.data)
        else {
            return;
        };
        for attr in convert_attrs(attrs) {
            if existing.iter().all(|a| a.name != attr.name) {
                existing.push(attr);
            }
        }
    }

    fn remove_from_parent(&self, target: &NodeId) {
        self.dom.borrow_mut().detach(*target);
    }

    fn reparent_children(&self, node: &NodeId, new_parent: &NodeId) {
        let mut dom = self.dom.borrow_mut();
        let moved: Vec<_> = dom.children(*node).collect();
        for child in moved {
            dom.append(*new_parent, child);
        }
    }
}
