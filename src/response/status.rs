//! RDAP status values and their EPP equivalents (RFC 8056)

/// EPP status for an RDAP status value, if there is one
pub fn epp_status(rdap_status: &str) -> Option<&'static str> {
    let epp = match rdap_status {
        "add period" => "addPeriod",
        "auto renew period" => "autoRenewPeriod",
        "client delete prohibited" => "clientDeleteProhibited",
        "client hold" => "clientHold",
        "client renew prohibited" => "clientRenewProhibited",
        "client transfer prohibited" => "clientTransferProhibited",
        "client update prohibited" => "clientUpdateProhibited",
        "inactive" => "inactive",
        "associated" => "linked",
        "active" => "ok",
        "pending create" => "pendingCreate",
        "pending delete" => "pendingDelete",
        "pending renew" => "pendingRenew",
        "pending restore" => "pendingRestore",
        "pending transfer" => "pendingTransfer",
        "pending update" => "pendingUpdate",
        "redemption period" => "redemptionPeriod",
        "renew period" => "renewPeriod",
        "server delete prohibited" => "serverDeleteProhibited",
        "server renew prohibited" => "serverRenewProhibited",
        "server transfer prohibited" => "serverTransferProhibited",
        "server update prohibited" => "serverUpdateProhibited",
        "server hold" => "serverHold",
        "transfer period" => "transferPeriod",
        _ => return None,
    };
    Some(epp)
}
