//! The `areuniq` / `uniqenum` macro generator.
//!
//! `areuniqN(p0,...)` expands to a proof that its `N` arguments are pairwise
//! distinct. Up to some `N` the cheapest proof spells out every pair; past it
//! the `N` slots are split into three groups and the proof becomes three
//! calls to smaller `areuniq` macros, one per pair of groups.

pub mod config;
pub mod partition;


use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::escape::EscapeCache;
use crate::format::Arg;
use crate::ident::{self, IdentCache, Scope};
use crate::writer::{self, join, CodeWriter};
pub use config::{AssertWhen, Assertion, GeneratorConfig, NameTemplates};

/// Groups a clique decomposition splits the slots into.
pub const BRANCHING: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Areuniq,
    Uniqenum,
}

impl Family {
    pub const ALL: [Family; 2] = [Family::Areuniq, Family::Uniqenum];

    /// Smallest `n` that produces any output.
    pub fn min_n(self) -> u64 {
        match self {
            Family::Areuniq => 2,
            Family::Uniqenum => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Family::Areuniq => "areuniq",
            Family::Uniqenum => "uniqenum",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated macro name with its identifier-codec preimage, if it has one.
#[derive(Debug, Clone)]
struct MacroName {
    ident: String,
    preimage: Option<u64>,
}

/// Identifiers of one `uniqenum` macro's parameters.
struct EnumParams {
    tag: String,
    keys: Vec<String>,
    values: Vec<String>,
    alias: String,
}

impl EnumParams {
    fn new(idents: &IdentCache, scope: &Scope, n: u64) -> Self {
        Self {
            keys: (0..n).map(|i| idents.scoped(scope, i)).collect(),
            values: (n..2 * n).map(|i| idents.scoped(scope, i)).collect(),
            tag: idents.scoped(scope, 2 * n),
            alias: idents.scoped(scope, 2 * n + 1),
        }
    }
}

pub struct CodeGenerator {
    cfg: GeneratorConfig,
    idents: IdentCache,
    escapes: EscapeCache,
    areuniq_names: RefCell<HashMap<u64, MacroName>>,
    /// Smallest `n` whose clique form was no larger than its expanded form.
    pivot: Cell<u64>,
}

impl CodeGenerator {
    pub fn new(cfg: GeneratorConfig) -> Self {
        Self {
            cfg,
            idents: IdentCache::new(),
            escapes: EscapeCache::new(),
            areuniq_names: RefCell::new(HashMap::new()),
            pivot: Cell::new(u64::MAX),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.cfg
    }

    /// `n` from which the clique form is used without comparison, once known.
    pub fn pivot(&self) -> Option<u64> {
        Some(self.pivot.get()).filter(|&p| p != u64::MAX)
    }

    fn areuniq_name(&self, n: u64) -> MacroName {
        if let Some(name) = self.areuniq_names.borrow().get(&n) {
            return name.clone();
        }
        let ident = self.cfg.names.areuniq.render(&[("n", n.to_string().as_str())]);
        let name = MacroName {
            preimage: ident::decode(&ident),
            ident,
        };
        self.areuniq_names.borrow_mut().insert(n, name.clone());
        name
    }

    pub fn areuniq_ident(&self, n: u64) -> String {
        self.areuniq_name(n).ident
    }

    pub fn uniqenum_ident(&self, n: u64) -> String {
        self.cfg.names.uniqenum.render(&[("n", n.to_string().as_str())])
    }

    pub fn emit(&self, family: Family, w: &mut dyn CodeWriter, n: u64) {
        match family {
            Family::Areuniq => self.areuniq(w, n),
            Family::Uniqenum => self.uniqenum(w, n),
        }
    }

    /// Bytes [`CodeGenerator::emit`] would write.
    pub fn size(&self, family: Family, n: u64) -> usize {
        writer::measure(|w| self.emit(family, w, n))
    }

    /// Writes the `areuniq` macro over `n` parameters. No-op below 2.
    pub fn areuniq(&self, w: &mut dyn CodeWriter, n: u64) {
        if n < 2 {
            return;
        }
        if n == 2 {
            self.write_expanded(w, n);
            return;
        }
        let clique = w.save(&mut |w| self.write_clique(w, n));
        // both forms grow with n, so past the pivot the expanded one can't win back
        if n >= self.pivot.get() {
            w.replay(&clique);
            return;
        }
        let expanded = w.save(&mut |w| self.write_expanded(w, n));
        if clique.len() <= expanded.len() {
            self.pivot.set(self.pivot.get().min(n));
            w.replay(&clique);
        } else {
            w.replay(&expanded);
        }
    }

    /// Writes the `uniqenum` macro over `n` key/value pairs. No-op below 1.
    pub fn uniqenum(&self, w: &mut dyn CodeWriter, n: u64) {
        if n < 1 {
            return;
        }
        let name = self.uniqenum_ident(n);
        if n == 1 {
            let params = EnumParams::new(&self.idents, &Scope::unrestricted(), n);
            self.write_enum(w, &name, &params);
            w.str("\n");
            return;
        }

        let areuniq = self.areuniq_name(n);
        let reserved = [ident::decode("enum"), ident::decode(&name), areuniq.preimage];
        let scope = Scope::reserving(reserved.into_iter().flatten());
        let params = EnumParams::new(&self.idents, &scope, n);
        self.write_enum(w, &name, &params);
        match self.cfg.assertion.when {
            AssertWhen::All => {
                w.str(";");
                call_macro(w, &areuniq.ident, &params.keys);
            }
            AssertWhen::Once => {
                w.str(";_Static_assert(");
                call_macro(w, &areuniq.ident, &params.keys);
                w.str(",");
                let count = n.to_string();
                self.cfg.assertion.message.write_cstring(
                    w,
                    &self.escapes,
                    &[
                        ("n", Arg::Value(&count)),
                        ("name", Arg::Param(&params.tag)),
                        ("type", Arg::Param(&params.alias)),
                    ],
                );
                w.str(")");
            }
        }
        w.str("\n");
    }

    fn write_enum(&self, w: &mut dyn CodeWriter, name: &str, params: &EnumParams) {
        w.str("#define ").str(name).str("(").str(&params.tag);
        for (key, value) in params.keys.iter().zip(&params.values) {
            w.str(",").str(key).str(",").str(value);
        }
        w.str(",").str(&params.alias).str(")");
        w.str("enum ").str(&params.tag).str("{");
        join(w, ",", params.keys.iter().zip(&params.values), |w, (key, value)| {
            w.str(key).str("=(").str(value).str(")");
        });
        w.str("}").str(&params.alias);
    }

    fn separator(&self) -> &'static str {
        match self.cfg.assertion.when {
            AssertWhen::All => ";",
            AssertWhen::Once => "*",
        }
    }

    fn write_pair(&self, w: &mut dyn CodeWriter, a: &str, b: &str) {
        match self.cfg.assertion.when {
            AssertWhen::All => {
                w.str("_Static_assert((").str(a).str(")!=(").str(b).str("),");
                self.cfg.assertion.message.write_cstring(
                    w,
                    &self.escapes,
                    &[("enumerator1", Arg::Param(a)), ("enumerator2", Arg::Param(b))],
                );
                w.str(")");
            }
            AssertWhen::Once => {
                w.str("((").str(a).str(")!=(").str(b).str("))");
            }
        }
    }

    fn define_areuniq(
        &self,
        w: &mut dyn CodeWriter,
        n: u64,
        scope: &Scope,
        body: impl FnOnce(&mut dyn CodeWriter),
    ) {
        w.str("#define ").str(&self.areuniq_name(n).ident).str("(");
        join(w, ",", 0..n, |w, i| {
            w.str(&self.idents.scoped(scope, i));
        });
        w.str(")");
        body(w);
        w.str("\n");
    }

    /// Every pair compared directly.
    fn write_expanded(&self, w: &mut dyn CodeWriter, n: u64) {
        let scope = Scope::unrestricted();
        self.define_areuniq(w, n, &scope, |w| {
            join(w, self.separator(), partition::combinations(n), |w, (a, b)| {
                self.write_pair(w, &self.idents.get(a), &self.idents.get(b));
            });
        });
    }

    /// One smaller `areuniq` call per pair of groups.
    fn write_clique(&self, w: &mut dyn CodeWriter, n: u64) {
        let cliques = partition::cliques(n, BRANCHING);
        let names: Vec<MacroName> = cliques
            .iter()
            .map(|members| self.areuniq_name(members.len() as u64))
            .collect();
        // parameters must not shadow the helpers they call
        let scope = Scope::reserving(names.iter().filter_map(|name| name.preimage));
        self.define_areuniq(w, n, &scope, |w| {
            join(w, self.separator(), cliques.iter().zip(&names), |w, (members, name)| {
                let args: Vec<String> = members.iter().map(|&i| self.idents.scoped(&scope, i)).collect();
                call_macro(w, &name.ident, &args);
            });
        });
    }
}

fn call_macro(w: &mut dyn CodeWriter, name: &str, args: &[String]) {
    w.str(name).str("(");
    join(w, ",", args, |w, arg| {
        w.str(arg);
    });
    w.str(")");
}
