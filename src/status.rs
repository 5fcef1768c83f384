//! Fixed status vocabularies stored as upper-case text columns.
// region:    --- Imports
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// endregion: --- Imports

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownStatus {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! status_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownStatus;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownStatus {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = UnknownStatus;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

status_enum!(
    /// Lifecycle of an auction. Transitions are driven by operators and are not validated here.
    AuctionStatus, "auction status" {
        Rascunho => "RASCUNHO",
        EmPreparacao => "EM_PREPARACAO",
        EmBreve => "EM_BREVE",
        Aberto => "ABERTO",
        AbertoParaLances => "ABERTO_PARA_LANCES",
        Pregao => "PREGAO",
        SoftClose => "SOFT_CLOSE",
        Encerrado => "ENCERRADO",
        Finalizado => "FINALIZADO",
        Cancelado => "CANCELADO",
        Suspenso => "SUSPENSO",
    }
);

impl AuctionStatus {
    /// Bids are only taken while the auction is in one of these states.
    pub fn accepts_bids(&self) -> bool {
        matches!(
            self,
            AuctionStatus::AbertoParaLances | AuctionStatus::Pregao | AuctionStatus::SoftClose
        )
    }

    /// The auction can no longer receive lots.
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            AuctionStatus::Encerrado | AuctionStatus::Finalizado | AuctionStatus::Cancelado
        )
    }
}

status_enum!(
    LotStatus, "lot status" {
        Rascunho => "RASCUNHO",
        EmBreve => "EM_BREVE",
        AbertoParaLances => "ABERTO_PARA_LANCES",
        Encerrado => "ENCERRADO",
        Vendido => "VENDIDO",
        NaoVendido => "NAO_VENDIDO",
        Relistado => "RELISTADO",
        Cancelado => "CANCELADO",
        Retirado => "RETIRADO",
    }
);

impl LotStatus {
    /// Only lots that left their auction without a sale can be offered again.
    pub fn can_be_relisted(&self) -> bool {
        matches!(
            self,
            LotStatus::NaoVendido
                | LotStatus::Encerrado
                | LotStatus::Cancelado
                | LotStatus::Retirado
        )
    }
}

status_enum!(
    BidStatus, "bid status" {
        Ativo => "ATIVO",
        Cancelado => "CANCELADO",
        Vencedor => "VENCEDOR",
        Expirado => "EXPIRADO",
    }
);

status_enum!(
    PaymentStatus, "payment status" {
        Pendente => "PENDENTE",
        Processando => "PROCESSANDO",
        Pago => "PAGO",
        Falhou => "FALHOU",
        Reembolsado => "REEMBOLSADO",
        Cancelado => "CANCELADO",
    }
);
