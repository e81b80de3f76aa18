use proc_macro::TokenStream as TokenStream1;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::{self, Ident};

/// This macro is added before a method of `Simulator` struct in the impl block.
/// Use this macro to first check if current game phase is exactly the phase in
/// the attribute.
///
/// For example, `#[allowed_phase(PlayerTurn)]` will make a method first check
/// if current game phase is `PlayerTurn`. If not, the method will return
/// `crate::Error::WrongPhase`. The method must therefore return
/// `Result<_, crate::Error>`, and `GamePhase` must be in scope.
#[proc_macro_attribute]
pub fn allowed_phase(attr: TokenStream1, item: TokenStream1) -> TokenStream1 {
    let mut ast: syn::ImplItemFn =
        syn::parse(item).expect("allowed_phase can only be put on a method");
    let phase: Ident =
        syn::parse(attr).expect("allowed_phase expects exactly one GamePhase variant");
    let method = ast.sig.ident.to_string();

    let early_return: syn::Stmt =
        syn::parse2(phase_guard(&phase, &method)).expect("phase guard is a valid statement");
    ast.block.stmts.insert(0, early_return);
    ast.into_token_stream().into()
}

fn phase_guard(phase: &Ident, method: &str) -> TokenStream2 {
    quote! {
        if self.current_game_phase != GamePhase::#phase {
            return Err(crate::Error::WrongPhase {
                method: #method,
                expected: GamePhase::#phase,
                actual: self.current_game_phase,
            });
        }
    }
}
